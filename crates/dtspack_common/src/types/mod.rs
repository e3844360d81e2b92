pub mod declaration_map;
pub mod export_record;
pub mod output_asset;
