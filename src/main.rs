//! WASM entry point: mounts the app to the document body.

use leptos::mount::mount_to_body;
use mindgraph_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
