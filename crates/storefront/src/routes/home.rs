//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::layout::LayoutContext;

// =============================================================================
// Static Content
// =============================================================================

/// A menu category highlighted on the home page.
#[derive(Clone)]
pub struct CategoryCard {
    pub name: &'static str,
    pub blurb: &'static str,
}

/// A selling point shown under the hero.
#[derive(Clone)]
pub struct Highlight {
    pub title: &'static str,
    pub text: &'static str,
}

const CATEGORIES: &[CategoryCard] = &[
    CategoryCard {
        name: "Main Courses",
        blurb: "Crispy fried chicken, grills and family buckets.",
    },
    CategoryCard {
        name: "Beverages",
        blurb: "Fresh juices, soft drinks and iced coffee.",
    },
    CategoryCard {
        name: "Desserts",
        blurb: "Something sweet to finish the meal.",
    },
];

const HIGHLIGHTS: &[Highlight] = &[
    Highlight {
        title: "Fast delivery",
        text: "Hot food at your door in 25-35 minutes, or pick a time that suits you.",
    },
    Highlight {
        title: "Fresh every day",
        text: "Marinated overnight and cooked to order at your nearest branch.",
    },
    Highlight {
        title: "Member offers",
        text: "Use coupon codes at checkout for up to 25% off.",
    },
];

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutContext,
    pub categories: &'static [CategoryCard],
    pub highlights: &'static [Highlight],
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the home page.
#[instrument(skip(layout))]
pub async fn home(layout: LayoutContext) -> impl IntoResponse {
    HomeTemplate {
        layout,
        categories: CATEGORIES,
        highlights: HIGHLIGHTS,
    }
}
