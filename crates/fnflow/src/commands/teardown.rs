use crate::context::Context;
use colored::Colorize;
use fnflow_cloud::StepOutcome;

pub async fn handle(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let names = ctx.names();

    if !json {
        println!("{}", "関数リソースを削除中...".yellow());
        println!("ラン名: {}", names.run().cyan());
        println!("コンパートメント: {}", ctx.compartment_id.cyan());
        println!();
    }

    let report = match ctx.lifecycle().teardown(&ctx.compartment_id).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} 削除を中断しました: {}", "Error:".red().bold(), e);
            eprintln!(
                "{}",
                "ヒント: しばらく待ってから fnflow teardown を再実行してください".yellow()
            );
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Deleted { id } => {
                println!("  ✓ {}: {} {}", step.kind, step.name.cyan(), id.dimmed());
            }
            StepOutcome::Skipped => {
                println!("  ℹ {}: {} は見つかりません", step.kind, step.name);
            }
        }
    }

    println!();
    println!(
        "{}",
        format!("✓ 削除が完了しました ({})", report.summary()).green().bold()
    );

    Ok(())
}
