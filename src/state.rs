use std::sync::Arc;

use crate::{
    db::OrmConn,
    view::{HtmlShell, Presenter},
};

#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<OrmConn>,
    pub presenter: Arc<dyn Presenter>,
}

impl AppState {
    pub fn new(orm: impl Into<Arc<OrmConn>>, app_name: impl Into<String>) -> Self {
        Self {
            orm: orm.into(),
            presenter: Arc::new(HtmlShell::new(app_name)),
        }
    }

    /// The connection services run their queries on.
    pub fn db(&self) -> &OrmConn {
        &self.orm
    }
}
