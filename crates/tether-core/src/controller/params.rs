//! Parameter bags sent under the `params` key of each call.

use crate::models::Page;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct IdParams<'a> {
    pub id: &'a str,
}

#[derive(Serialize)]
pub(crate) struct DataParams<'a, D> {
    pub data: &'a D,
}

#[derive(Serialize)]
pub(crate) struct UpdateParams<'a, D> {
    pub id: &'a str,
    pub data: &'a D,
}

#[derive(Serialize)]
pub(crate) struct ListParams {
    pub page: Option<Page>,
}
