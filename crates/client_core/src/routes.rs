use std::fmt;

use shared::domain::CompanyId;

/// The two navigable views: the directory at `/` and a company's detail page
/// at `/company/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Directory,
    CompanyDetail(CompanyId),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('/');

        if path.is_empty() {
            return Some(Self::Directory);
        }

        let mut segments = path.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("company"), Some(id), None) => {
                id.parse::<i64>().ok().map(|id| Self::CompanyDetail(CompanyId(id)))
            }
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Directory => "/".to_string(),
            Self::CompanyDetail(id) => format!("/company/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
