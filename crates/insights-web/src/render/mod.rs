//! Page rendering
//!
//! Pages are minijinja templates compiled into the binary. Template names
//! end in `.html`, so every interpolated value is HTML-escaped.

pub mod chart;
pub mod report;
pub mod table;

pub use chart::{LineChart, compact_amount};
pub use report::{FETCH_ERROR_MESSAGE, HtmlReport};
pub use table::TableView;

use minijinja::{Environment, context};
use serde::Serialize;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("report.html", include_str!("../../templates/report.html")),
    ("chart.html", include_str!("../../templates/chart.html")),
];

/// Values shown in the input form
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormValues {
    pub ticker: String,
    pub value_proposition: String,
}

/// Compiled page templates
#[derive(Debug)]
pub struct Pages {
    env: Environment<'static>,
    app_name: String,
}

impl Pages {
    pub fn new(app_name: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self {
            env,
            app_name: app_name.into(),
        })
    }

    /// The input form, optionally followed by a report or a fetch error
    pub fn index(
        &self,
        form: &FormValues,
        report: Option<&HtmlReport>,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {
            app_name => self.app_name,
            form => form,
            report => report,
        })
    }
}
