//! In-process declaration linker working like a scope-hoisting bundler over `.d.ts` files.

mod generate;
mod linker;
mod module_graph;

use anyhow::Context;
use dtspack_common::DtsExtension;
use dtspack_error::{BuildResult, DtsError};
use sugar_path::SugarPath;

use self::{generate::generate, linker::Linker, module_graph::ModuleGraph};
use super::{DeclarationBundler, RollupContext};

pub struct NativeDtsBundler;

impl DeclarationBundler for NativeDtsBundler {
  fn name(&self) -> &'static str {
    "native"
  }

  fn accepts_entry_extension(&self, _extension: DtsExtension) -> bool {
    true
  }

  fn bundle(&self, ctx: &RollupContext) -> BuildResult<()> {
    let graph = ModuleGraph::build(ctx.loader, ctx.aggregation_path, ctx.aggregation_source)?;
    let linked = Linker::new(&graph).link().map_err(|err| {
      DtsError::unsupported(
        ctx.aggregation_path.relative(&ctx.options.cwd).to_slash_lossy(),
        err.to_string(),
      )
    })?;
    let code = generate(&graph, &linked);

    ctx
      .fs
      .write(ctx.output_path, code.as_bytes())
      .with_context(|| format!("Failed to write {}", ctx.output_path.display()))?;
    Ok(())
  }
}
