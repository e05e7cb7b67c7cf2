//! Static chart layout per service and human labels for event codes.
//!
//! The order of charts and of query sets inside a chart is significant: the
//! counters API answers positionally, so results are matched back to query
//! sets by walking these tables in declaration order.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuerySetMetadata {
    pub name: &'static str,
    pub event_types: &'static [i32],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChartMetadata {
    pub title: &'static str,
    pub div_id: &'static str,
    pub query_sets: &'static [QuerySetMetadata],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceChartMetadata {
    pub service: &'static str,
    pub charts: &'static [ChartMetadata],
}

impl ServiceChartMetadata {
    pub fn query_set_count(&self) -> usize {
        self.charts.iter().map(|c| c.query_sets.len()).sum()
    }

    /// Query sets in the order their queries are submitted.
    pub fn query_sets(&self) -> impl Iterator<Item = &'static QuerySetMetadata> {
        self.charts.iter().flat_map(|c| c.query_sets.iter())
    }
}

pub static CHART_LABELS: &[(&str, &str)] = &[
    // HTTP
    ("99", "Total Requests"),
    ("200", "200"),
    ("201", "201"),
    ("204", "204"),
    ("300", "300"),
    ("302", "302"),
    ("304", "304"),
    ("307", "307"),
    ("400", "400"),
    ("403", "403"),
    ("404", "404"),
    ("409", "409"),
    ("500", "500"),
    ("501", "501"),
    ("502", "502"),
    ("503", "503"),
    ("504", "504"),
    // Plex
    ("1002", "U/P Login"),
    ("2240", "Social Login"),
    ("1010", "Logout"),
    ("1003", "Session Error"),
    ("1004", "Provider Error"),
    ("1005", "Input Error"),
    ("1006", "MFA Error"),
    ("1035", "Create Account Calls"),
    ("1036", "Bad Input"),
    ("1038", "Provider Error"),
    ("1045", "Authorize Calls"),
    ("1055", "Token Calls"),
    // Authz
    ("1890", "List Object Types"),
    ("2450", "Get Object Type"),
    ("1950", "List Objects"),
    ("1960", "Get Object"),
    ("2000", "Get Edge"),
    ("1910", "List Edge Types"),
    ("1920", "Get Edge Type"),
    ("1990", "List Edges"),
    ("1900", "Create Object Type"),
    ("1930", "Create Edge Type"),
    ("1970", "Create Object"),
    ("2010", "Create Edge"),
    ("1980", "Delete Object"),
    ("2020", "Delete Edge"),
    // IDP
    ("1620", "Logins Password"),
    ("1650", "Create Account"),
    ("1680", "Migrate Account"),
    ("1640", "Get UserInfo"),
    ("1630", "Update User"),
    ("2110", "Get User"),
    ("2100", "Get Users"),
    // Console
    ("1700", "Login"),
    ("1710", "Logout"),
    ("1750", "Creates"),
    ("1760", "Deletes"),
    ("1860", "Add Members"),
    ("1870", "Remove Members"),
    ("1800", "Create"),
    ("1810", "Delete"),
    // Tokenizer
    ("2610", "Access Policy Create"),
    ("2600", "Access Policy Get"),
    ("2620", "Access Policy Update"),
    ("2630", "Access Policy Delete"),
    ("2660", "Transformer Create"),
    ("2650", "Transformer Get"),
    ("2670", "Transformer Delete"),
    ("2570", "Create"),
    ("2580", "Delete"),
    ("2830", "Resolution"),
    ("2820", "Lookup"),
    ("2810", "Inspect"),
];

pub fn chart_label(series_key: &str) -> Option<&'static str> {
    CHART_LABELS
        .iter()
        .find(|(code, _)| *code == series_key)
        .map(|(_, label)| *label)
}

const HTTP_RETURN_CODES: ChartMetadata = ChartMetadata {
    title: "HTTP Return Codes For All Requests",
    div_id: "containerHttp",
    query_sets: &[
        QuerySetMetadata {
            name: "Success",
            event_types: &[99, 200, 201, 204],
        },
        QuerySetMetadata {
            name: "Redirect",
            event_types: &[300, 302, 304, 307],
        },
        QuerySetMetadata {
            name: "Client Error",
            event_types: &[400, 403, 404, 409],
        },
        QuerySetMetadata {
            name: "Server Error",
            event_types: &[500, 501, 502, 503, 504],
        },
    ],
};

pub static SERVICE_CHARTS: &[ServiceChartMetadata] = &[
    ServiceChartMetadata {
        service: "plex",
        charts: &[
            HTTP_RETURN_CODES,
            ChartMetadata {
                title: "Logins and Logouts",
                div_id: "containerRequests",
                query_sets: &[
                    QuerySetMetadata {
                        name: "Login and Logout",
                        event_types: &[1002, 2240, 1010],
                    },
                    QuerySetMetadata {
                        name: "Errors",
                        event_types: &[1003, 1004, 1005, 1006],
                    },
                ],
            },
            ChartMetadata {
                title: "Account Creation",
                div_id: "containerAccCreation",
                query_sets: &[
                    QuerySetMetadata {
                        name: "Create Account",
                        event_types: &[1035],
                    },
                    QuerySetMetadata {
                        name: "Errors",
                        event_types: &[1036, 1038],
                    },
                ],
            },
            ChartMetadata {
                title: "Authorize and Token Generation Calls",
                div_id: "containerAuthAndToken",
                query_sets: &[QuerySetMetadata {
                    name: "Authorize and Token Calls",
                    event_types: &[1045, 1055],
                }],
            },
        ],
    },
    ServiceChartMetadata {
        service: "authz",
        charts: &[
            HTTP_RETURN_CODES,
            ChartMetadata {
                title: "Creates",
                div_id: "containerRequests",
                query_sets: &[QuerySetMetadata {
                    name: "Create Types",
                    event_types: &[1900, 1930, 1970, 2010],
                }],
            },
            ChartMetadata {
                title: "Queries",
                div_id: "containerAccCreation",
                query_sets: &[
                    QuerySetMetadata {
                        name: "Object Types",
                        event_types: &[1890, 2450, 1950, 1960],
                    },
                    QuerySetMetadata {
                        name: "Edge Types",
                        event_types: &[1910, 2000, 1920, 1990],
                    },
                ],
            },
            ChartMetadata {
                title: "Deletes",
                div_id: "containerAuthAndToken",
                query_sets: &[QuerySetMetadata {
                    name: "Object",
                    event_types: &[1980, 2020],
                }],
            },
        ],
    },
    ServiceChartMetadata {
        service: "idp",
        charts: &[
            HTTP_RETURN_CODES,
            ChartMetadata {
                title: "Logins",
                div_id: "containerRequests",
                query_sets: &[QuerySetMetadata {
                    name: "Logins Password",
                    event_types: &[1620],
                }],
            },
            ChartMetadata {
                title: "Account Creation",
                div_id: "containerAccCreation",
                query_sets: &[QuerySetMetadata {
                    name: "Account Calls",
                    event_types: &[1650, 1680],
                }],
            },
            ChartMetadata {
                title: "Queries",
                div_id: "containerAuthAndToken",
                query_sets: &[QuerySetMetadata {
                    name: "User Info",
                    event_types: &[1640, 1630, 2110, 2100],
                }],
            },
        ],
    },
    ServiceChartMetadata {
        service: "console",
        charts: &[
            HTTP_RETURN_CODES,
            ChartMetadata {
                title: "Console Activity",
                div_id: "containerRequests",
                query_sets: &[QuerySetMetadata {
                    name: "Login and Logout",
                    event_types: &[1700, 1710],
                }],
            },
            ChartMetadata {
                title: "Companies",
                div_id: "containerAccCreation",
                query_sets: &[QuerySetMetadata {
                    name: "Creates and Deletes",
                    event_types: &[1750, 1760, 1860, 1870],
                }],
            },
            ChartMetadata {
                title: "Tenants",
                div_id: "containerAuthAndToken",
                query_sets: &[QuerySetMetadata {
                    name: "Creates and Deletes",
                    event_types: &[1800, 1810],
                }],
            },
        ],
    },
    ServiceChartMetadata {
        service: "tokenizer",
        charts: &[
            HTTP_RETURN_CODES,
            ChartMetadata {
                title: "Policies and Transformers",
                div_id: "containerRequests",
                query_sets: &[
                    QuerySetMetadata {
                        name: "Access Policies",
                        event_types: &[2610, 2600, 2620, 2630],
                    },
                    QuerySetMetadata {
                        name: "Transformers",
                        event_types: &[2660, 2650, 2670],
                    },
                ],
            },
            ChartMetadata {
                title: "Tokens",
                div_id: "containerAccCreation",
                query_sets: &[QuerySetMetadata {
                    name: "Tokens",
                    event_types: &[2570, 2580],
                }],
            },
            ChartMetadata {
                title: "Token Resolution",
                div_id: "containerAuthAndToken",
                query_sets: &[QuerySetMetadata {
                    name: "Token Resolution",
                    event_types: &[2830, 2820, 2810],
                }],
            },
        ],
    },
];

pub fn service_chart_metadata(service: &str) -> Option<&'static ServiceChartMetadata> {
    SERVICE_CHARTS.iter().find(|m| m.service == service)
}

pub fn is_known_service(service: &str) -> bool {
    service_chart_metadata(service).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_service_has_four_charts_with_event_codes() {
        for meta in SERVICE_CHARTS {
            assert_eq!(meta.charts.len(), 4, "{}", meta.service);
            for qs in meta.query_sets() {
                assert!(!qs.event_types.is_empty(), "{} / {}", meta.service, qs.name);
            }
        }
    }

    #[test]
    fn test_services_are_unique() {
        let names: HashSet<_> = SERVICE_CHARTS.iter().map(|m| m.service).collect();
        assert_eq!(names.len(), SERVICE_CHARTS.len());
        assert!(is_known_service("tokenizer"));
        assert!(!is_known_service("logserver"));
    }

    #[test]
    fn test_every_charted_code_has_a_label() {
        for meta in SERVICE_CHARTS {
            for qs in meta.query_sets() {
                for code in qs.event_types {
                    assert!(
                        chart_label(&code.to_string()).is_some(),
                        "missing label for {}",
                        code
                    );
                }
            }
        }
    }

    #[test]
    fn test_chart_label_lookup() {
        assert_eq!(chart_label("99"), Some("Total Requests"));
        assert_eq!(chart_label("2830"), Some("Resolution"));
        assert_eq!(chart_label("12345"), None);
    }

    #[test]
    fn test_query_set_count_matches_iteration() {
        let authz = service_chart_metadata("authz").unwrap();
        assert_eq!(authz.query_set_count(), 8);
        assert_eq!(authz.query_sets().count(), 8);
    }
}
