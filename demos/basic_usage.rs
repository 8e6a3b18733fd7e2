//! Basic usage of blobfs.
//!
//! Builds a store over the in-memory client, then walks through directory
//! creation, uploads, listing, copy, move and deletion.
//!
//! Run with: `RUST_LOG=blobfs=debug cargo run --example basic_usage`

use blobfs::*;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn print_tree(title: &str, entries: &[Entry]) {
    println!("{title}");
    for entry in entries {
        match entry {
            Entry::Directory(d) => println!("  [dir]  {}/", d.path),
            Entry::File(f) => println!("  [file] {} ({} bytes)", f.path, f.size),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // =========================================================================
    // Step 1: Configure a store
    // =========================================================================

    let client = Arc::new(MemoryBlobClient::new());
    let config = StoreConfig::new("devaccount", "media")
        .with_base_path("tenants/acme")
        .with_poll_interval(Duration::from_millis(50));
    let store = BlobFileStore::new(client.clone(), config);

    // =========================================================================
    // Step 2: Directories and files
    // =========================================================================

    store.create_directory("photos/2024").await?;
    store.create_directory("inbox").await?;
    store
        .write("photos/2024/beach.jpg", Bytes::from_static(b"jpeg bytes"), false)
        .await?;
    store
        .write("notes.txt", Bytes::from_static(b"remember the milk"), false)
        .await?;

    let root = store.list_directory("", ListOptions::default()).await?;
    print_tree("Root:", &root);

    // =========================================================================
    // Step 3: Copy and move
    // =========================================================================

    // The in-memory client can simulate a slow server-side copy.
    client.set_copy_latency(3);
    store
        .copy_file("photos/2024/beach.jpg", "photos/favourite.jpg")
        .await?;
    client.set_copy_latency(0);

    store.move_file("notes.txt", "inbox/notes.txt").await?;

    let tree = store.list_directory("", ListOptions::RECURSIVE).await?;
    print_tree("After copy and move:", &tree);

    // =========================================================================
    // Step 4: Errors carry context
    // =========================================================================

    match store.copy_file("inbox/notes.txt", "photos/favourite.jpg").await {
        Err(e) => println!("Expected failure: {e}"),
        Ok(()) => println!("Unexpected success"),
    }
    match store.delete_directory("/").await {
        Err(e) => println!("Expected failure: {e}"),
        Ok(_) => println!("Unexpected success"),
    }

    // =========================================================================
    // Step 5: Clean up
    // =========================================================================

    store.delete_directory("photos").await?;
    let root = store.list_directory("", ListOptions::default()).await?;
    print_tree("After deleting photos:", &root);

    println!("Raw keys in the container:");
    for key in client.keys() {
        println!("  {key}");
    }

    Ok(())
}
