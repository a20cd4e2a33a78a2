//! List orders placed from this store.

use anyhow::Result;

use super::OrdersArgs;
use crate::context::Context;
use crate::orders::FileOrderGateway;

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let gateway = FileOrderGateway::new(ctx.orders_path());
    let mut orders = gateway.orders().await?;

    // Newest first.
    orders.reverse();
    if let Some(limit) = args.limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("Orders");
    if orders.is_empty() {
        ctx.output.info("No orders placed yet");
        return Ok(());
    }

    let widths = [24, 20, 8, 6];
    ctx.output
        .table_row(&["ORDER", "PLACED", "USER", "ITEMS"], &widths);
    for record in &orders {
        ctx.output.table_row(
            &[
                record.order_id.as_str(),
                &record.request.date.format("%Y-%m-%d %H:%M").to_string(),
                &record.request.user_id.to_string(),
                &record.request.item_count().to_string(),
            ],
            &widths,
        );
    }
    Ok(())
}
