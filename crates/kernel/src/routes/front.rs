//! Public site.

use axum::Router;
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;

use super::helpers::{page_context, render};
use crate::content::{PublicPage, visible_sections};
use crate::state::AppState;

/// Create the front page router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(front_page))
}

/// GET /
///
/// Shows the active sections in order: the first as the hero, the rest as
/// alternating blocks. With nothing visible, shows the placeholder page.
async fn front_page(State(state): State<AppState>) -> Response {
    state.content().refresh().await;

    let collection = state.content().collection();
    let visible = visible_sections(collection.iter());

    match PublicPage::build(&visible) {
        PublicPage::UnderConstruction => {
            let context = page_context(&state, "Under construction");
            render(&state, "front/under-construction.html", &context)
        }
        PublicPage::Sections { hero, blocks } => {
            let mut context = page_context(&state, &hero.title);
            context.insert("hero", &hero);
            context.insert("blocks", &blocks);
            render(&state, "front/page.html", &context)
        }
    }
}
