//! WASM API - `#[wasm_bindgen]` exports for the browser editor and viewer.
//!
//! This module is only compiled when targeting `wasm32`. The host does the
//! network I/O and hands raw page content in; everything else runs here:
//! - `init_session` / `destroy_session` - lifecycle
//! - `load_page` - tolerant parse with legacy and default fallback
//! - `add_block` / `delete_block` / `move_block` / `reorder` / `apply_edit` - editing
//! - `page_json` - the content string to POST back
//! - `render_page` / `render_html` / `activate` - viewer
//! - `get_block_types` / `validate_page` - discovery and checks

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::builder::PageBuilder;
use crate::core::block::{Block, BlockKind};
use crate::core::page::{Direction, PageKey};
use crate::core::registry::BlockCatalog;
use crate::core::validation::PageValidator;
use crate::editor::BlockEdit;
use crate::render::{html, NodePath, Renderer, Target};
use crate::store::{LoadSource, MemoryContentApi};

// ── Trivial async executor for WASM ─────────────────────────────────────────
//
// The in-memory content API never suspends, so every future completes on
// the first poll.

fn block_on<F: core::future::Future>(fut: F) -> Option<F::Output> {
    let mut fut = core::pin::pin!(fut);
    let waker = noop_waker();
    let mut cx = core::task::Context::from_waker(&waker);
    match fut.as_mut().poll(&mut cx) {
        core::task::Poll::Ready(result) => Some(result),
        core::task::Poll::Pending => None,
    }
}

fn noop_waker() -> core::task::Waker {
    use std::task::{RawWaker, RawWakerVTable};

    fn no_op(_: *const ()) {}
    fn clone(p: *const ()) -> RawWaker {
        RawWaker::new(p, &VTABLE)
    }

    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);

    unsafe { core::task::Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) }
}

// ── Global state ────────────────────────────────────────────────────────────

thread_local! {
    static SESSION: RefCell<Option<PageBuilder<MemoryContentApi>>> = RefCell::new(None);
}

fn with_session<R>(f: impl FnOnce(&mut PageBuilder<MemoryContentApi>) -> R) -> Result<R, String> {
    SESSION.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(session) => Ok(f(session)),
            None => Err("Session not initialized. Call init_session() first.".into()),
        }
    })
}

// ── Response types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LoadResponse<'a> {
    key: String,
    source: LoadSource,
    blocks: &'a [Block],
}

#[derive(Serialize)]
struct IndexResponse {
    index: usize,
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct ActivateRequest {
    path: NodePath,
    #[serde(default = "default_target")]
    target: Target,
}

fn default_target() -> Target {
    Target::Node
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| json_err(e.to_string()))
}

fn json_ok() -> String {
    json(&OkResponse { ok: true })
}

fn json_err(msg: impl Into<String>) -> String {
    serde_json::to_string(&ErrorResponse { error: msg.into() }).unwrap_or_default()
}

fn flatten(result: Result<String, String>) -> String {
    result.unwrap_or_else(json_err)
}

// ── Exported functions ──────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn init_session() {
    console_error_panic_hook::set_once();

    SESSION.with(|cell| {
        *cell.borrow_mut() = Some(PageBuilder::new(MemoryContentApi::new()));
    });
}

#[wasm_bindgen]
pub fn destroy_session() {
    SESSION.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Select `key` using the raw content the host fetched for it (and, for
/// `prices`, for the legacy key). Empty strings mean "no content".
#[wasm_bindgen]
pub fn load_page(key: &str, content: &str, legacy_content: &str) -> String {
    let key = PageKey::from(key);

    flatten(with_session(|session| {
        let api = session.store().api();
        api.put(key.as_str(), content);
        if let Some(legacy) = key.legacy_key() {
            api.put(legacy.as_str(), legacy_content);
        }

        match block_on(session.select(key.clone())) {
            Some(source) => json(&LoadResponse {
                key: key.to_string(),
                source,
                blocks: session.blocks(),
            }),
            None => json_err("Page load did not complete"),
        }
    }))
}

#[wasm_bindgen]
pub fn add_block(kind: &str) -> String {
    let kind: BlockKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => return json_err(format!("{}", e)),
    };
    flatten(with_session(|session| match session.add_block(kind) {
        Ok(index) => json(&IndexResponse { index }),
        Err(e) => json_err(e.to_string()),
    }))
}

#[wasm_bindgen]
pub fn delete_block(index: usize) -> String {
    flatten(with_session(|session| match session.delete_block(index) {
        Ok(_) => json_ok(),
        Err(e) => json_err(e.to_string()),
    }))
}

/// `direction` is `"up"` or `"down"`.
#[wasm_bindgen]
pub fn move_block(index: usize, direction: &str) -> String {
    let direction = match direction {
        "up" => Direction::Up,
        "down" => Direction::Down,
        other => return json_err(format!("Unknown direction: '{}'", other)),
    };
    flatten(with_session(|session| {
        json(&OkResponse {
            ok: session.move_block(index, direction),
        })
    }))
}

#[wasm_bindgen]
pub fn reorder(source: usize, destination: usize) -> String {
    flatten(with_session(|session| match session.reorder(source, destination) {
        Ok(()) => json_ok(),
        Err(e) => json_err(e.to_string()),
    }))
}

#[wasm_bindgen]
pub fn apply_edit(index: usize, edit_json: &str) -> String {
    let edit: BlockEdit = match serde_json::from_str(edit_json) {
        Ok(e) => e,
        Err(e) => return json_err(format!("Invalid edit JSON: {}", e)),
    };
    flatten(with_session(|session| match session.edit_block(index, edit) {
        Ok(()) => session
            .blocks()
            .get(index)
            .map(json)
            .unwrap_or_else(json_ok),
        Err(e) => json_err(e.to_string()),
    }))
}

/// Content string for `POST /pages/{key}`.
#[wasm_bindgen]
pub fn page_json() -> String {
    flatten(with_session(|session| {
        Block::serialize_sequence(session.blocks()).unwrap_or_else(|e| json_err(e.to_string()))
    }))
}

#[wasm_bindgen]
pub fn render_page(width: f64) -> String {
    flatten(with_session(|session| {
        json(&Renderer::render(session.blocks(), width))
    }))
}

#[wasm_bindgen]
pub fn render_html(width: f64) -> String {
    with_session(|session| html::to_html(&Renderer::render(session.blocks(), width)))
        .unwrap_or_else(json_err)
}

/// Resolve a click into an activation the host performs.
#[wasm_bindgen]
pub fn activate(width: f64, request_json: &str) -> String {
    let request: ActivateRequest = match serde_json::from_str(request_json) {
        Ok(r) => r,
        Err(e) => return json_err(format!("Invalid activation JSON: {}", e)),
    };
    flatten(with_session(|session| {
        let page = Renderer::render(session.blocks(), width);
        match page.activate(&request.path, request.target) {
            Some(activation) => json(&activation),
            None => "null".to_string(),
        }
    }))
}

#[wasm_bindgen]
pub fn get_block_types() -> String {
    json(&BlockCatalog::standard().entries())
}

#[wasm_bindgen]
pub fn validate_page() -> String {
    flatten(with_session(|session| {
        json(&PageValidator::validate(session.blocks()))
    }))
}
