macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

/// Route definitions of the dispatch backend
pub mod backend {
    pub const ROOT: &str = "/api";

    pub mod messengers {
        pub const COLLECTION: &str = api_path!("/messengers");
        pub const ITEM: &str = api_path!("/messengers/{id}");
    }

    pub mod dispatches {
        pub const COLLECTION: &str = api_path!("/dispatches");
        pub const TODAY: &str = api_path!("/dispatches/today");
    }

    pub mod reports {
        pub const DAILY: &str = api_path!("/reports/daily");
        pub const EXPORT_EXCEL: &str = api_path!("/reports/export-excel");
    }
}

/// Helper utilities for working with route templates
pub mod utils {
    use url::form_urlencoded::byte_serialize;

    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    ///
    /// The value is percent-encoded so ids can never inject path segments.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        let encoded: String = byte_serialize(value.as_ref().as_bytes()).collect();
        route.replace(param, &encoded)
    }

    /// Append query parameters to the provided route.
    pub fn with_query<V: AsRef<str>>(
        route: &str,
        params: &[(&str, V)],
    ) -> String {
        if params.is_empty() {
            return route.to_string();
        }

        let mut path =
            String::with_capacity(route.len() + 1 + params.len() * 16);
        path.push_str(route);
        path.push('?');

        for (i, (key, value)) in params.iter().enumerate() {
            if i > 0 {
                path.push('&');
            }
            path.push_str(key);
            path.push('=');
            path.extend(byte_serialize(value.as_ref().as_bytes()));
        }

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_share_api_prefix() {
        assert_eq!(backend::messengers::COLLECTION, "/api/messengers");
        assert_eq!(backend::reports::DAILY, "/api/reports/daily");
    }

    #[test]
    fn replace_param_encodes_value() {
        let path =
            utils::replace_param(backend::messengers::ITEM, "{id}", "a/b");
        assert_eq!(path, "/api/messengers/a%2Fb");
    }

    #[test]
    fn with_query_joins_pairs() {
        let path = utils::with_query(
            backend::dispatches::COLLECTION,
            &[("date", "2025-03-04"), ("messenger_id", "m-1")],
        );
        assert_eq!(path, "/api/dispatches?date=2025-03-04&messenger_id=m-1");

        let empty: [(&str, &str); 0] = [];
        assert_eq!(
            utils::with_query(backend::dispatches::TODAY, &empty),
            "/api/dispatches/today"
        );
    }
}
