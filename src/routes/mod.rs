//! Route table: URL paths mapped to pages under two layouts, the signed-in
//! dashboard and the anonymous auth pages. Resolution is purely declarative;
//! any access control lives on the backend.

mod history;

pub use history::{use_history, History};

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Dashboard,
    Auth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    App,
    Login,
    Register,
    ForgotPassword,
    NotFound,
}

impl Page {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Page::App => "Dashboard",
            Page::Login => "Login",
            Page::Register => "Create account",
            Page::ForgotPassword => "Forgot password",
            Page::NotFound => "Not found",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.title())
    }
}

/// A child route; `path: None` is the index page of its layout.
#[derive(Clone, Copy, Debug)]
pub struct Route {
    pub path: Option<&'static str>,
    pub page: Page,
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutRoute {
    pub path: &'static str,
    pub layout: Layout,
    pub children: &'static [Route],
}

pub const ROUTES: &[LayoutRoute] = &[
    LayoutRoute {
        path: "/",
        layout: Layout::Dashboard,
        children: &[Route {
            path: None,
            page: Page::App,
        }],
    },
    LayoutRoute {
        path: "/auth",
        layout: Layout::Auth,
        children: &[
            Route {
                path: Some("login"),
                page: Page::Login,
            },
            Route {
                path: Some("register"),
                page: Page::Register,
            },
            Route {
                path: Some("forgot-password"),
                page: Page::ForgotPassword,
            },
        ],
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub path: String,
    pub layout: Option<Layout>,
    pub page: Page,
}

/// Resolves `path` against [`ROUTES`]. Query strings, fragments and trailing
/// slashes are ignored; unknown paths resolve to [`Page::NotFound`].
#[must_use]
pub fn resolve(path: &str) -> RouteMatch {
    let path = normalize_path(path);

    for layout in ROUTES {
        for route in layout.children {
            if full_path(layout, route) == path {
                return RouteMatch {
                    path,
                    layout: Some(layout.layout),
                    page: route.page,
                };
            }
        }
    }

    RouteMatch {
        path,
        layout: None,
        page: Page::NotFound,
    }
}

/// Canonical path of `page`, if it is routed.
#[must_use]
pub fn path_of(page: Page) -> Option<String> {
    ROUTES.iter().find_map(|layout| {
        layout
            .children
            .iter()
            .find(|route| route.page == page)
            .map(|route| full_path(layout, route))
    })
}

/// Every routed path with its layout and page, in declaration order.
#[must_use]
pub fn table() -> Vec<RouteMatch> {
    ROUTES
        .iter()
        .flat_map(|layout| {
            layout.children.iter().map(move |route| RouteMatch {
                path: full_path(layout, route),
                layout: Some(layout.layout),
                page: route.page,
            })
        })
        .collect()
}

fn full_path(layout: &LayoutRoute, route: &Route) -> String {
    match route.path {
        None => layout.path.to_string(),
        Some(child) => format!("{}/{}", layout.path.trim_end_matches('/'), child),
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}
