//! URL table with logical route names.
//!
//! Every path the server answers is declared once here. Handlers build links
//! through [`Route`] or [`reverse`] instead of formatting paths by hand, and
//! [`resolve`] maps a concrete path back to its route.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use matchit::Router as MatchitRouter;
use thiserror::Error;

/// Logical name of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    PostDetail,
    PostNew,
    PostEdit,
    PostDelete,
}

impl RouteName {
    pub const ALL: [RouteName; 5] = [
        RouteName::Home,
        RouteName::PostDetail,
        RouteName::PostNew,
        RouteName::PostEdit,
        RouteName::PostDelete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::PostDetail => "post_detail",
            RouteName::PostNew => "post_new",
            RouteName::PostEdit => "post_edit",
            RouteName::PostDelete => "post_delete",
        }
    }

    /// Path pattern, with `{param}` placeholders.
    pub fn pattern(self) -> &'static str {
        match self {
            RouteName::Home => "/",
            RouteName::PostDetail => "/post/{pk}/",
            RouteName::PostNew => "/post/new",
            RouteName::PostEdit => "/post/{pk}/edit",
            RouteName::PostDelete => "/post/{pk}/delete",
        }
    }

    /// Parameters the pattern expects, in order.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            RouteName::Home | RouteName::PostNew => &[],
            RouteName::PostDetail | RouteName::PostEdit | RouteName::PostDelete => &["pk"],
        }
    }

    /// Fill the pattern with `params`. Every expected parameter must be given
    /// exactly once and nothing else.
    pub fn reverse(self, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let expected = self.params();
        if let Some((extra, _)) = params.iter().find(|(k, _)| !expected.iter().any(|p| p == k)) {
            return Err(RouteError::UnexpectedParam {
                route: self.as_str(),
                param: extra.to_string(),
            });
        }

        let mut path = self.pattern().to_string();
        for &param in expected {
            let value = params
                .iter()
                .find(|(k, _)| *k == param)
                .map(|(_, v)| *v)
                .ok_or(RouteError::MissingParam {
                    route: self.as_str(),
                    param,
                })?;
            if value.is_empty() || value.contains('/') {
                return Err(RouteError::InvalidParam {
                    route: self.as_str(),
                    param,
                    value: value.to_string(),
                });
            }
            path = path.replace(&format!("{{{param}}}"), value);
        }
        Ok(path)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteName::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| RouteError::UnknownName(s.to_string()))
    }
}

/// Reverse lookup failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route named '{0}'")]
    UnknownName(String),

    #[error("route '{route}' needs parameter '{param}'")]
    MissingParam {
        route: &'static str,
        param: &'static str,
    },

    #[error("route '{route}' takes no parameter '{param}'")]
    UnexpectedParam { route: &'static str, param: String },

    #[error("'{value}' is not a valid '{param}' for route '{route}'")]
    InvalidParam {
        route: &'static str,
        param: &'static str,
        value: String,
    },
}

/// Build the path for a route given by name.
///
/// `reverse("post_detail", &[("pk", "1")])` is `/post/1/`.
pub fn reverse(name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
    name.parse::<RouteName>()?.reverse(params)
}

/// A route together with its arguments. Paths built from it are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    PostDetail { pk: i32 },
    PostNew,
    PostEdit { pk: i32 },
    PostDelete { pk: i32 },
}

impl Route {
    pub fn name(self) -> RouteName {
        match self {
            Route::Home => RouteName::Home,
            Route::PostDetail { .. } => RouteName::PostDetail,
            Route::PostNew => RouteName::PostNew,
            Route::PostEdit { .. } => RouteName::PostEdit,
            Route::PostDelete { .. } => RouteName::PostDelete,
        }
    }

    pub fn path(self) -> String {
        match self {
            Route::Home | Route::PostNew => self.name().pattern().to_string(),
            Route::PostDetail { pk } | Route::PostEdit { pk } | Route::PostDelete { pk } => self
                .name()
                .pattern()
                .replace("{pk}", &pk.to_string()),
        }
    }
}

/// A concrete path matched back to its route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: RouteName,
    pub params: Vec<(String, String)>,
}

impl ResolvedRoute {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

static RESOLVER: LazyLock<MatchitRouter<RouteName>> = LazyLock::new(|| {
    let mut router = MatchitRouter::new();
    for name in RouteName::ALL {
        router
            .insert(name.pattern(), name)
            .expect("route table patterns do not conflict");
    }
    router
});

/// Match a request path against the route table.
pub fn resolve(path: &str) -> Option<ResolvedRoute> {
    let matched = RESOLVER.at(path).ok()?;
    Some(ResolvedRoute {
        name: *matched.value,
        params: matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    })
}
