//! Headless scroll sweep.
//!
//! Loads a page and its bindings from `scrollanim.toml` (or the path given as
//! the first argument), scrolls through the page and prints every property
//! write. Set `RUST_LOG=debug` to see bindings and per-element progress.

use std::path::PathBuf;

use anyhow::{Context, Result};
use scrollanim_config::ScrollAnimConfig;
use scrollanim_core::ScrollAnimator;
use scrollanim_core::headless::WriteLog;

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = ScrollAnimConfig::load(path.as_deref()).context("failed to load configuration")?;
    if config.bindings.is_empty() {
        log::warn!("no bindings configured; nothing to animate");
    }

    let mut document = config.document.clone();
    let mut animator = ScrollAnimator::new();
    animator.register_action("log-progress", |element, _, progress| {
        log::info!("{element}: progress {progress:.3}");
    });
    for binding in &config.bindings {
        animator
            .bind(binding.element.clone(), binding.options.clone(), &document)
            .with_context(|| format!("failed to bind `{}`", binding.element))?;
    }
    log::info!(
        "sweeping {} bindings over 0..={} in steps of {}",
        animator.len(),
        config.sweep.max,
        config.sweep.step
    );

    let mut writes = WriteLog::new();
    let mut total = 0;
    for top in config.scroll_positions() {
        document.scroll_to(top);
        let updated = animator.on_viewport_changed(&document, &document, &mut writes);
        if updated == 0 {
            continue;
        }
        log::debug!("scroll_top={top}: {updated} bindings updated");
        for write in writes.writes() {
            println!("{top:>8} {:<16} {:<20} {}", write.element, write.property, write.value);
        }
        total += document.commit(&mut writes);
    }
    log::info!("applied {total} writes");
    Ok(())
}
