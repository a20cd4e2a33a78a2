//! Place an order for the cart.

use anyhow::Result;
use dialoguer::Confirm;
use storefront_commerce::checkout::CheckoutService;

use super::CheckoutArgs;
use crate::context::Context;
use crate::orders::FileOrderGateway;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let mut cart = store.cart();
    let service = CheckoutService::new(FileOrderGateway::new(ctx.orders_path()), ctx.pricing());

    if args.user.is_some() && !cart.is_empty() && !args.yes && !ctx.output.is_json() {
        let total = cart.quote(&ctx.pricing(), chrono::Utc::now().timestamp()).total;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Place order for {} items, total {}?",
                cart.item_count(),
                total
            ))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Checkout cancelled");
            return store.close().await;
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let result = service.checkout(args.user, &mut cart).await;
    spinner.finish_and_clear();

    // Flush even when the order failed so nothing queued is lost.
    store.close().await?;
    let receipt = result?;

    if ctx.output.is_json() {
        ctx.output.json(&receipt);
        return Ok(());
    }

    ctx.output.success("Order placed");
    ctx.output.kv("Order", receipt.order_id.as_str());
    ctx.output.kv(
        "Items",
        &format!("{} ({} products)", receipt.item_count, receipt.line_count),
    );
    ctx.output.kv(
        "Placed",
        &receipt.placed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    println!();
    ctx.output.breakdown(&receipt.breakdown);
    ctx.output
        .debug(&format!("Order log: {}", service.gateway().path().display()));
    Ok(())
}
