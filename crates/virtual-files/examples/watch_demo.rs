//! Serve generated files from memory and react to changes.
//!
//! ```bash
//! RUST_LOG=virtual_files=debug cargo run --example watch_demo
//! ```

use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use virtual_files::{FileInfo, FileProvider, MemorySource, StoreBuilder, StoreOptions};

fn print_tree(provider: &dyn FileProvider, dir: &str, depth: usize) {
    for node in provider.directory_contents(dir) {
        let indent = "  ".repeat(depth);
        if node.is_directory() {
            println!("{indent}{}/", node.name());
            print_tree(provider, node.path(), depth + 1);
        } else {
            println!("{indent}{} ({} bytes)", node.name(), node.length());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = StoreOptions::from_toml_str(r#"case_sensitivity = "insensitive""#)?;
    let store = Arc::new(
        StoreBuilder::new()
            .options(options)
            .add_file("/index.html", MemorySource::new("<h1>Home</h1>"))
            .add_file("/assets/site.css", MemorySource::new("body {}"))
            .add_file("/assets/img/logo.svg", MemorySource::new("<svg/>"))
            .build(),
    );

    println!("Initial tree:");
    print_tree(store.as_ref(), "/", 1);

    let token = store.watch("/assets/**/*.css");
    token.register_callback(|| println!("-> stylesheet changed"));

    store.add(
        "/Assets/site.css",
        Arc::new(MemorySource::new("body { color: red; }")),
        false,
    );

    let mut css = String::new();
    store
        .file_info("/assets/SITE.css")
        .open_read()?
        .read_to_string(&mut css)?;
    println!("site.css now reads: {css}");

    println!("Watch fired: {}", token.has_changed());
    Ok(())
}
