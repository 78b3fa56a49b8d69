use crate::context::Context;
use colored::Colorize;
use fnflow_cloud::SetupRequest;

pub async fn handle(ctx: &Context, image: &str, json: bool) -> anyhow::Result<()> {
    let names = ctx.names();
    let settings = &ctx.settings;

    if !json {
        println!("{}", "関数リソースをセットアップ中...".yellow());
        println!("ラン名: {}", names.run().cyan());
        println!("コンパートメント: {}", ctx.compartment_id.cyan());
        println!("イメージ: {}", image.cyan());
        println!();
    }

    let mut request = SetupRequest::new(&ctx.compartment_id, image);
    request.placement = settings.placement.clone();
    request.memory_in_mbs = settings.memory_in_mbs;
    request.timeout_in_seconds = settings.timeout_in_seconds;

    let provisioned = match ctx.lifecycle().setup(&request).await {
        Ok(provisioned) => provisioned,
        Err(e) => {
            // 途中まで作成されたリソースはそのまま残る
            eprintln!("{} セットアップに失敗しました: {}", "Error:".red().bold(), e);
            eprintln!();
            eprintln!(
                "{}",
                "ヒント: 作成済みのリソースは次のコマンドで削除できます:".yellow()
            );
            eprintln!("  fnflow teardown --name {}", names.run());
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&provisioned)?);
        return Ok(());
    }

    for (kind, name, id) in provisioned.entries() {
        println!("  ✓ {}: {} {}", kind, name.cyan(), id.dimmed());
    }

    println!();
    println!("{}", "✓ セットアップが完了しました！".green().bold());
    println!(
        "{}",
        format!("  fnflow invoke --name {} で関数を呼び出せます", names.run()).dimmed()
    );

    Ok(())
}
