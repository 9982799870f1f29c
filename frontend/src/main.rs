use leptos::prelude::*;
use quickcourt_frontend::App;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    let config = quickcourt_frontend::load_config();
    quickcourt_frontend::web::init_logging(&config.log_level);
    tracing::info!(api_base = %config.api_base, "starting QuickCourt");
    mount_to_body(move || view! { <App config=config.clone() /> });
}
