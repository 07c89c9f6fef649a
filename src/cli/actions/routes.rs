use crate::routes::{self, Layout, RouteMatch};

#[derive(Debug)]
pub struct Args {
    pub path: Option<String>,
}

/// Execute the routes action: resolve one path, or print the whole table.
pub fn execute(args: &Args) {
    match &args.path {
        Some(path) => println!("{}", render(&routes::resolve(path))),
        None => {
            for route in routes::table() {
                println!("{}", render(&route));
            }
        }
    }
}

fn render(route: &RouteMatch) -> String {
    let layout = match route.layout {
        Some(Layout::Dashboard) => "dashboard",
        Some(Layout::Auth) => "auth",
        None => "-",
    };
    format!("{:<24} {:<10} {}", route.path, layout, route.page)
}
