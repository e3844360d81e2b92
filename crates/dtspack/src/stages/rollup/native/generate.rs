use dtspack_ecmascript::{DeclarationModule, DeclarationStmt, DeclarationStmtKind};
use dtspack_utils::{concat_string, ecmascript::to_module_import_export_name, indexmap::FxIndexMap};
use itertools::Itertools;
use string_wizard::MagicString;

use super::{
  linker::{LinkOutput, SymbolRef},
  module_graph::{ModuleGraph, ModuleIdx},
};

/// Renders the rolled-up declaration file.
pub fn generate(graph: &ModuleGraph, linked: &LinkOutput) -> String {
  let mut sections = vec![];

  let directives = graph
    .sorted_modules
    .iter()
    .flat_map(|idx| graph.modules[*idx].ast.reference_directives.iter())
    .unique()
    .join("\n");
  if !directives.is_empty() {
    sections.push(directives);
  }

  let imports = render_external_imports(linked);
  if !imports.is_empty() {
    sections.push(imports);
  }

  for &idx in &graph.sorted_modules {
    let module = &graph.modules[idx].ast;
    let stmts = module
      .stmts
      .iter()
      .enumerate()
      .filter(|(stmt_idx, _)| linked.included_stmts[idx][*stmt_idx])
      .map(|(_, stmt)| render_stmt(idx, module, stmt, linked))
      .join("\n");
    if !stmts.is_empty() {
      sections.push(stmts);
    }
  }

  for (idx, members) in &linked.namespaces {
    let name = linked.canonical_name(&SymbolRef::Namespace(*idx));
    let specifiers = members
      .iter()
      .map(|(exported, symbol)| export_specifier(linked.canonical_name(symbol), exported))
      .join(", ");
    sections.push(concat_string!("declare namespace ", name, " {\n  export { ", specifiers, " };\n}"));
  }

  let mut export_lines = vec![];
  if !linked.exports.is_empty() {
    let specifiers = linked
      .exports
      .iter()
      .map(|(exported, symbol)| export_specifier(linked.canonical_name(symbol), exported))
      .join(", ");
    export_lines.push(concat_string!("export { ", specifiers, " };"));
  }
  for specifier in &linked.external_star_exports {
    export_lines.push(concat_string!("export * from '", specifier, "';"));
  }
  if export_lines.is_empty() {
    export_lines.push("export {};".to_string());
  }
  sections.push(export_lines.join("\n"));

  let mut code = sections.join("\n\n");
  code.push('\n');
  code
}

fn export_specifier(local: &str, exported: &str) -> String {
  if local == exported {
    local.to_string()
  } else {
    concat_string!(local, " as ", to_module_import_export_name(exported))
  }
}

#[derive(Default)]
struct ExternalImports<'a> {
  namespaces: Vec<&'a str>,
  defaults: Vec<&'a str>,
  named: Vec<(&'a str, &'a str)>,
}

fn render_external_imports(linked: &LinkOutput) -> String {
  let mut by_specifier = FxIndexMap::<&str, ExternalImports>::default();
  for symbol in &linked.externals {
    let local = linked.canonical_name(symbol);
    match symbol {
      SymbolRef::ExternalNamespace(specifier) => {
        by_specifier.entry(specifier).or_default().namespaces.push(local);
      }
      SymbolRef::External { specifier, imported } if imported == "default" => {
        by_specifier.entry(specifier).or_default().defaults.push(local);
      }
      SymbolRef::External { specifier, imported } => {
        by_specifier.entry(specifier).or_default().named.push((imported.as_str(), local));
      }
      SymbolRef::Local(..) | SymbolRef::Namespace(_) => {}
    }
  }

  let mut lines = vec![];
  for (specifier, imports) in by_specifier {
    for local in imports.namespaces {
      lines.push(concat_string!("import * as ", local, " from '", specifier, "';"));
    }
    for local in imports.defaults {
      lines.push(concat_string!("import ", local, " from '", specifier, "';"));
    }
    if !imports.named.is_empty() {
      let specifiers = imports
        .named
        .iter()
        .map(|(imported, local)| {
          if imported == local {
            (*local).to_string()
          } else {
            concat_string!(to_module_import_export_name(imported), " as ", local)
          }
        })
        .join(", ");
      lines.push(concat_string!("import { ", specifiers, " } from '", specifier, "';"));
    }
  }
  lines.join("\n")
}

/// Renders one statement with its leading comments, `export` removed and every top-level
/// identifier replaced by its canonical name.
fn render_stmt(
  idx: ModuleIdx,
  module: &DeclarationModule,
  stmt: &DeclarationStmt,
  linked: &LinkOutput,
) -> String {
  let start = stmt.leading_start as usize;
  let end = stmt.span.end as usize;
  let mut magic_string = MagicString::new(&module.source[start..end]);
  let in_stmt = |span_start: u32, span_end: u32| span_start >= stmt.span.start && span_end <= stmt.span.end;

  if let DeclarationStmtKind::Declaration { export_prefix, anonymous_default } = &stmt.kind {
    if let Some((span, replacement)) = export_prefix {
      let (prefix_start, prefix_end) = (span.start as usize - start, span.end as usize - start);
      if replacement.is_empty() {
        magic_string.remove(prefix_start, prefix_end);
      } else {
        magic_string.update(prefix_start, prefix_end, *replacement);
      }
    }
    if let Some(anonymous) = anonymous_default {
      let name = linked.canonical_name(&SymbolRef::Local(idx, anonymous.local.clone()));
      magic_string.append_left(anonymous.insert_at as usize - start, concat_string!(" ", name));
    }
  }

  for name in &stmt.declared {
    let canonical = linked.canonical_name(&SymbolRef::Local(idx, name.clone()));
    if canonical == name || canonical.is_empty() {
      continue;
    }
    let Some(local) = module.locals.get(name) else { continue };
    for span in local.spans.iter().filter(|span| in_stmt(span.start, span.end)) {
      magic_string.update(span.start as usize - start, span.end as usize - start, canonical.to_string());
    }
  }

  for name in &stmt.referenced {
    let Some(symbol) = linked.resolved_bindings.get(&(idx, name.clone())) else { continue };
    let canonical = linked.canonical_name(symbol);
    if canonical == name || canonical.is_empty() {
      continue;
    }
    for span in module.references.get(name).into_iter().flatten().filter(|span| in_stmt(span.start, span.end)) {
      magic_string.update(span.start as usize - start, span.end as usize - start, canonical.to_string());
    }
  }

  magic_string.to_string()
}
