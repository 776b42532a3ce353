//! Counter Example - Cells, components and re-rendering
//!
//! This example demonstrates the reactive core of spark-dom:
//! - A component reading a cell subscribes to it
//! - A click handler writes the cell
//! - The component's subtree is rendered again and swapped in
//!
//! Run with: RUST_LOG=spark_dom=debug cargo run --example counter

use spark_dom::{Document, RenderConfig, Renderer, cell, component, h};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== spark-dom Counter Example ===\n");

    let renderer = Renderer::with_config(Document::new(), RenderConfig::from_env()?)?;
    let count = cell(0);
    let label = cell("clicks".to_string());

    // Component reading both cells
    let view_count = count.clone();
    let view_label = label.clone();
    let counter = component(move || {
        let on_click = view_count.clone();
        h("div.counter")
            .child(h("p").child(&view_label).child(": ").child(&view_count))
            .child(
                h("button#increment.primary")
                    .attr("type", "button")
                    .on("onclick", move || {
                        if let Err(err) = on_click.update(|n| n + 1) {
                            eprintln!("re-render failed: {err}");
                        }
                    })
                    .child("+1"),
            )
    });

    let body = renderer.backend().body();
    renderer.mount(&body, &counter.into())?;

    let doc = renderer.backend();
    println!("Initial:\n  {}\n", doc.to_html(body));

    println!("--- Clicking the button three times ---\n");
    for _ in 0..3 {
        if let Some(button) = doc.find_by_id("increment") {
            doc.dispatch(button, "onclick");
        }
    }
    println!("After clicks:\n  {}\n", doc.to_html(body));

    println!("--- Renaming the label ---\n");
    label.write("presses".to_string())?;
    println!("After rename:\n  {}\n", doc.to_html(body));

    println!("Subscribers of `count`: {:?}", count.subscriber_ids());

    Ok(())
}
