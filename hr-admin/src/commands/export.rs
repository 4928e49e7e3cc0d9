use super::employees::ListArgs;
use super::{fail_with_notification, require_employees_screen};
use crate::app::AppContext;
use crate::employees::ListState;
use crate::export::ExportFormat;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(value_enum, help = "Output format")]
    pub format: ExportFormat,

    #[command(flatten)]
    pub list: ListArgs,
}

/// Exports cover the loaded page only, never the whole roster
pub async fn handle(args: ExportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    require_employees_screen(ctx)?;
    let page = ctx.employees_page();

    let state = args.list.load(&page).await;
    let total = match &state {
        ListState::Loaded(p) => p.total_elements,
        _ => return Err(fail_with_notification(ctx, crate::employees::controller::LOAD_FAILED)),
    };

    let now = chrono::Local::now().naive_local();
    let path = page
        .export(args.format, now)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let rows = page.current_page().map(|p| p.content.len()).unwrap_or_default();
    println!(
        "Exportada la página {} ({} de {} empleados) a {}",
        args.list.page,
        rows,
        total,
        path.display()
    );
    Ok(())
}
