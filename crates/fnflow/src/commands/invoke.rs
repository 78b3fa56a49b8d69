use crate::context::Context;
use std::io::Write;

/// レスポンスは加工せず stdout にそのまま出す
pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let response = ctx
        .lifecycle()
        .invoke(&ctx.compartment_id, &ctx.settings.payload)
        .await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
