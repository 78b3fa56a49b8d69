use crate::context::Context;
use colored::Colorize;
use fnflow_cloud::ResourceKind;

pub async fn handle(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let names = ctx.names();
    let found = ctx.lifecycle().discover(&ctx.compartment_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    println!("ラン名: {}", names.run().cyan());
    println!("コンパートメント: {}", ctx.compartment_id.cyan());
    println!();

    for kind in ResourceKind::CREATION_ORDER {
        let name = names.for_kind(kind);
        match found.lookup(kind) {
            Some((id, state)) if state.is_ready() => {
                println!(
                    "  ✓ {}: {} [{}] {}",
                    kind,
                    name.cyan(),
                    state.to_string().green(),
                    id.dimmed()
                );
            }
            Some((id, state)) => {
                println!(
                    "  ⚠ {}: {} [{}] {}",
                    kind,
                    name.cyan(),
                    state.to_string().yellow(),
                    id.dimmed()
                );
            }
            None => {
                println!("  - {}: {} {}", kind, name, "(なし)".dimmed());
            }
        }
    }

    println!();
    if found.is_empty() {
        println!("{}", "リソースは作成されていません".dimmed());
    }

    Ok(())
}
