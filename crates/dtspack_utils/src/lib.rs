pub mod concat_string;
pub mod dts_path;
pub mod ecmascript;
pub mod indexmap;
pub mod path_ext;
