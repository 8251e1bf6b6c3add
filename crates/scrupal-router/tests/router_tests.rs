//! Integration tests for scrupal-router
//!
//! Tests are organized by feature area and cover:
//! - Ordered, exact-arity matching
//! - Parameter extraction and decoding
//! - Trailing-slash patterns
//! - Otherwise fallback (redirect and dedicated route)
//! - Table validation
//! - Named routes and URL generation

use pretty_assertions::assert_eq;
use rstest::rstest;
use scrupal_router::*;
use std::collections::HashMap;

/// The API documentation table: same patterns, templates and fallback as the apidoc app
fn apidoc_table() -> RouteTable {
    RouteTable::builder()
        .when("/", "chunks/apidoc/intro.html", "Intro")
        .when("/:method", "chunks/apidoc/top.html", "Top")
        .when("/:method/:kind", "chunks/apidoc/kind.html", "Kind")
        .when("/:method/:kind/", "chunks/apidoc/kind.html", "Kind")
        .when("/:method/:kind/:id", "chunks/apidoc/item.html", "Item")
        .when("/:method/:kind/:id/:trait", "chunks/apidoc/trait.html", "Trait")
        .otherwise_redirect("/")
        .build()
        .unwrap()
}

fn params(pairs: &[(&str, &str)]) -> RouteParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Basic matching
// ============================================================================

#[rstest]
#[case("/", "Intro")]
#[case("/GET", "Top")]
#[case("/GET/modules", "Kind")]
#[case("/GET/modules/", "Kind")]
#[case("/GET/modules/core", "Item")]
#[case("/GET/modules/core/Versioned", "Trait")]
fn test_apidoc_paths_select_controller(#[case] path: &str, #[case] controller: &str) {
    let table = apidoc_table();
    let m = table.resolve(path);
    assert_eq!(m.route.controller, controller);
    assert!(!m.is_fallback());
}

#[test]
fn test_root_has_no_params() {
    let m = apidoc_table().resolve("/");
    assert_eq!(m.route.view_template, "chunks/apidoc/intro.html");
    assert!(m.params.is_empty());
}

#[test]
fn test_item_params_are_literal_segments() {
    let m = apidoc_table().resolve("/POST/entities/page-42");
    assert_eq!(
        m.params,
        params(&[("method", "POST"), ("kind", "entities"), ("id", "page-42")])
    );
}

#[test]
fn test_trait_route_binds_four_params() {
    let m = apidoc_table().resolve("/GET/types/String/Describable");
    assert_eq!(m.params.len(), 4);
    assert_eq!(m.params.get("trait"), Some(&"Describable".to_string()));
}

#[test]
fn test_params_are_percent_decoded() {
    let m = apidoc_table().resolve("/GET/modules/core%20db");
    assert_eq!(m.params.get("id"), Some(&"core db".to_string()));
}

#[test]
fn test_query_and_fragment_are_ignored() {
    let m = apidoc_table().resolve("/GET/modules?page=2#top");
    assert_eq!(m.route.controller, "Kind");
    assert_eq!(m.params.get("kind"), Some(&"modules".to_string()));
}

#[test]
fn test_missing_leading_slash_is_tolerated() {
    let m = apidoc_table().resolve("GET/modules");
    assert_eq!(m.route.controller, "Kind");
}

// ============================================================================
// Ordering and arity
// ============================================================================

#[test]
fn test_prefix_pattern_does_not_cross_match() {
    let table = RouteTable::builder()
        .when("/:method", "top", "Top")
        .when("/:method/:kind", "kind", "Kind")
        .otherwise_redirect("/GET")
        .build()
        .unwrap();

    let m = table.resolve("/GET/foo");
    assert_eq!(m.route.controller, "Kind");
    assert_eq!(m.params, params(&[("method", "GET"), ("kind", "foo")]));
}

#[test]
fn test_first_registered_wins() {
    let table = RouteTable::builder()
        .when("/:method/:kind", "generic", "Generic")
        .when("/GET/:kind", "specific", "Specific")
        .otherwise(Route::new("/", "home", "Home"))
        .build()
        .unwrap();

    assert_eq!(table.resolve("/GET/modules").route.controller, "Generic");
}

#[test]
fn test_literal_registered_first_shadows_param() {
    let table = RouteTable::builder()
        .when("/GET/:kind", "specific", "Specific")
        .when("/:method/:kind", "generic", "Generic")
        .otherwise(Route::new("/", "home", "Home"))
        .build()
        .unwrap();

    assert_eq!(table.resolve("/GET/modules").route.controller, "Specific");
    assert_eq!(table.resolve("/PUT/modules").route.controller, "Generic");
}

#[rstest]
#[case("/a/b/c/d/e")]
#[case("/a/b/c/d/e/f")]
#[case("/GET//modules")]
#[case("//")]
fn test_unmatched_arity_falls_back(#[case] path: &str) {
    let m = apidoc_table().resolve(path);
    assert_eq!(m.route.controller, "Intro");
    assert_eq!(m.redirected_from.as_deref(), Some(path));
}

#[test]
fn test_every_arity_without_a_pattern_selects_default() {
    let table = RouteTable::builder()
        .when("/", "home", "Home")
        .when("/:a/:b", "pair", "Pair")
        .otherwise_redirect("/")
        .build()
        .unwrap();

    for n in 1..8 {
        let path: String = (0..n).map(|i| format!("/s{i}")).collect();
        let m = table.resolve(&path);
        if n == 2 {
            assert_eq!(m.route.controller, "Pair", "path {path}");
        } else {
            assert_eq!(m.route.controller, "Home", "path {path}");
            assert!(m.is_fallback());
        }
    }
}

// ============================================================================
// Trailing slashes
// ============================================================================

#[test]
fn test_trailing_slash_patterns_are_distinct() {
    let table = RouteTable::builder()
        .when("/:method/:kind", "plain", "Plain")
        .when("/:method/:kind/", "slashed", "Slashed")
        .otherwise(Route::new("/", "home", "Home"))
        .build()
        .unwrap();

    assert_eq!(table.resolve("/GET/modules").route.controller, "Plain");
    assert_eq!(table.resolve("/GET/modules/").route.controller, "Slashed");
}

#[test]
fn test_trailing_slash_not_normalized_away() {
    let table = RouteTable::builder()
        .when("/", "home", "Home")
        .when("/:method/:kind", "plain", "Plain")
        .otherwise_redirect("/")
        .build()
        .unwrap();

    let m = table.resolve("/GET/modules/");
    assert_eq!(m.route.controller, "Home");
    assert!(m.is_fallback());
}

// ============================================================================
// Case sensitivity
// ============================================================================

#[test]
fn test_literals_are_case_sensitive_by_default() {
    let table = RouteTable::builder()
        .when("/modules", "modules", "Modules")
        .otherwise(Route::new("/", "home", "Home"))
        .build()
        .unwrap();

    assert_eq!(table.resolve("/Modules").route.controller, "Home");
}

#[test]
fn test_case_insensitive_table() {
    let table = RouteTable::builder()
        .case_insensitive(true)
        .when("/modules/:name", "module", "Module")
        .otherwise(Route::new("/", "home", "Home"))
        .build()
        .unwrap();

    let m = table.resolve("/MODULES/Core");
    assert_eq!(m.route.controller, "Module");
    // Parameter values keep their case
    assert_eq!(m.params.get("name"), Some(&"Core".to_string()));
}

// ============================================================================
// Otherwise
// ============================================================================

#[test]
fn test_otherwise_route_has_no_params() {
    let table = RouteTable::builder()
        .when("/modules/:name", "module", "Module")
        .otherwise(Route::new("/404", "missing", "Missing"))
        .build()
        .unwrap();

    let m = table.resolve("/nope");
    assert_eq!(m.route.controller, "Missing");
    assert!(m.params.is_empty());
    assert_eq!(m.redirected_from.as_deref(), Some("/nope"));
}

#[test]
fn test_redirect_to_parameterized_route_keeps_its_params() {
    let table = RouteTable::builder()
        .when("/:method", "top", "Top")
        .otherwise_redirect("/GET")
        .build()
        .unwrap();

    let m = table.resolve("/a/b");
    assert_eq!(m.route.controller, "Top");
    assert_eq!(m.params, params(&[("method", "GET")]));
}

#[test]
fn test_controllers_lists_each_once_in_order() {
    assert_eq!(
        apidoc_table().controllers(),
        vec!["Intro", "Top", "Kind", "Item", "Trait"]
    );
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_missing_otherwise_is_rejected() {
    let err = RouteTable::builder().when("/", "home", "Home").build().unwrap_err();
    assert_eq!(err, RouteTableError::MissingOtherwise);
}

#[test]
fn test_unresolvable_redirect_is_rejected() {
    let err = RouteTable::builder()
        .when("/modules", "modules", "Modules")
        .otherwise_redirect("/")
        .build()
        .unwrap_err();
    assert_eq!(err, RouteTableError::UnresolvableRedirect("/".to_string()));
}

#[test]
fn test_empty_table_cannot_redirect() {
    let err = RouteTable::builder().otherwise_redirect("/").build().unwrap_err();
    assert!(matches!(err, RouteTableError::UnresolvableRedirect(_)));
}

#[rstest]
#[case("modules", RouteTableError::MissingLeadingSlash("modules".to_string()))]
#[case("/modules/:", RouteTableError::EmptyParamName("/modules/:".to_string()))]
#[case(
    "/:id/:id",
    RouteTableError::DuplicateParam { pattern: "/:id/:id".to_string(), param: "id".to_string() }
)]
fn test_invalid_patterns(#[case] pattern: &str, #[case] expected: RouteTableError) {
    let err = RouteTable::builder()
        .when(pattern, "t", "C")
        .otherwise(Route::new("/", "home", "Home"))
        .build()
        .unwrap_err();
    assert_eq!(err, expected);
}

#[test]
fn test_duplicate_route_names_are_rejected() {
    let err = RouteTable::builder()
        .when_route(Route::new("/a", "a", "A").with_name("page"))
        .when_route(Route::new("/b", "b", "B").with_name("page"))
        .otherwise_redirect("/a")
        .build()
        .unwrap_err();
    assert_eq!(err, RouteTableError::DuplicateName("page".to_string()));
}

// ============================================================================
// Named routes
// ============================================================================

#[test]
fn test_url_for_named_route() {
    let table = RouteTable::builder()
        .when("/", "home", "Home")
        .when_route(Route::new("/:method/:kind/:id", "item", "Item").with_name("apidoc.item"))
        .otherwise_redirect("/")
        .build()
        .unwrap();

    let url = table
        .url_for_params("apidoc.item", &[("method", "GET"), ("kind", "modules"), ("id", "core")])
        .unwrap();
    assert_eq!(url, "/GET/modules/core");

    // Generated URLs resolve back to the same route and params
    let m = table.resolve(&url);
    assert_eq!(m.route.name.as_deref(), Some("apidoc.item"));
    assert_eq!(m.params.get("id"), Some(&"core".to_string()));
}

#[test]
fn test_url_for_missing_param() {
    let table = RouteTable::builder()
        .when_route(Route::new("/sites/:name", "site", "Site").with_name("site"))
        .otherwise(Route::new("/", "home", "Home"))
        .build()
        .unwrap();

    assert_eq!(table.url_for("site", &HashMap::new()), None);
    assert_eq!(table.url_for("unknown", &HashMap::new()), None);
}

#[test]
fn test_url_for_keeps_trailing_slash() {
    let route = Route::new("/:method/:kind/", "kind", "Kind");
    let url = route
        .generate_url(&params(&[("method", "GET"), ("kind", "sites")]))
        .unwrap();
    assert_eq!(url, "/GET/sites/");
}

#[test]
fn test_url_for_root() {
    let route = Route::new("/", "home", "Home");
    assert_eq!(route.generate_url(&RouteParams::new()).unwrap(), "/");
}
