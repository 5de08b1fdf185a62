//! Terminal rendering for command results and notices.
//!
//! Results go to stdout; logs go to stderr through tracing.

#![allow(clippy::print_stdout)]

use generix_core::{Order, Product, User};
use generix_storefront::views::CartView;
use generix_storefront::{Notice, NoticeLevel};

pub fn line(text: &str) {
    println!("{text}");
}

/// Print notices in the order they were raised.
pub fn notices(notices: &[Notice]) {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        println!("[{tag}] {}", notice.message);
    }
}

pub fn cart(view: &CartView) {
    if view.items.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in &view.items {
        println!(
            "{:<24} {:<32} {:>4} x {:>12} = {:>12}",
            item.product_id, item.name, item.quantity, item.unit_price, item.subtotal
        );
    }
    println!("{} item(s), total {}", view.item_count, view.total);
}

pub fn products(products: &[&Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    for product in products {
        println!(
            "{:<24} {:<32} {:>12} {}",
            product.id,
            product.name,
            product.price,
            product.availability.label()
        );
    }
}

pub fn product(product: &Product) {
    println!("{} ({})", product.name, product.id);
    println!("  {}", product.description);
    println!("  {} - {}", product.price, product.availability.label());
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders yet.");
        return;
    }
    for order in orders {
        let placed = order.ordered_on.map_or_else(
            || "unknown date".to_string(),
            |at| at.format("%Y-%m-%d %H:%M").to_string(),
        );
        println!(
            "Order {} - {placed} - {} - {}",
            order.id,
            order.status.as_deref().unwrap_or("Pending"),
            order.total_price
        );
        for line in &order.lines {
            println!("  {:>4} x {:<32} {}", line.quantity, line.display_name(), line.subtotal);
        }
    }
}

pub fn user(user: &User) {
    let role = if user.is_admin { "admin" } else { "customer" };
    println!("{} <{}> ({role}, id {})", user.full_name(), user.email, user.id);
}
