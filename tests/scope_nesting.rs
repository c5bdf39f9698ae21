use std::cell::RefCell;
use std::rc::Rc;

use vitrine_router_rs::{
    Base, ContextError, History, NavigateOptions, RouteMatch, RouterContext, RouterScope,
};

#[test]
fn scope_when_navigating_then_the_active_route_tracks_the_location() {
    let history = History::in_memory();
    let mut context = RouterContext::new();
    let scope = context.enter_scope(&history, "/");

    let works = scope.register_route(Some("/works/:id"));
    scope.register_route(Some("/about"));

    let seen: Rc<RefCell<Vec<Option<RouteMatch>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = scope
        .active_route()
        .subscribe(move |active: &Option<RouteMatch>| sink.borrow_mut().push(active.clone()));

    history.navigate("/works/7", NavigateOptions::default());

    let seen = seen.borrow();
    let found = seen
        .last()
        .and_then(Clone::clone)
        .expect("route should be active after navigating");
    assert_eq!(found.route.handle, works);
    assert_eq!(found.params.get("id").map(String::as_str), Some("7"));
    assert_eq!(found.uri, "/works/7");
}

#[test]
fn scope_when_nothing_matches_then_the_default_route_is_active() {
    let history = History::in_memory();
    let mut context = RouterContext::new();
    let scope = context.enter_scope(&history, "/");

    scope.register_route(Some("/works"));
    let fallback = scope.register_route(None);

    history.navigate("/missing", NavigateOptions::default());

    let active = scope
        .active_route()
        .get()
        .expect("default route should catch everything");
    assert_eq!(active.route.handle, fallback);
    assert!(active.route.is_default);
    assert_eq!(active.uri, "/missing");
}

#[test]
fn scope_when_routes_share_a_pattern_then_unregistration_goes_by_handle() {
    let history = History::in_memory();
    let mut context = RouterContext::new();
    let scope = context.enter_scope(&history, "/");

    let first = scope.register_route(Some("/works"));
    let second = scope.register_route(Some("/works"));
    assert_ne!(first, second);

    scope.unregister_route(first);

    history.navigate("/works", NavigateOptions::default());
    let active = scope.active_route().get().expect("twin route survives");
    assert_eq!(active.route.handle, second);

    scope.unregister_route(second);
    scope.unregister_route(second);
    assert!(scope.active_route().get().is_none());
}

#[test]
fn scope_when_the_base_changes_then_registered_patterns_are_recomputed() {
    let history = History::in_memory();
    let scope = RouterScope::root(&history, "/");
    scope.register_route(Some("/works/:id"));

    scope.base().set(Base {
        path: "/v2".to_string(),
        uri: "/v2".to_string(),
    });
    assert_eq!(scope.routes().get()[0].pattern, "v2/works/:id/");

    scope.base().set(Base {
        path: "/".to_string(),
        uri: "/".to_string(),
    });
    assert_eq!(scope.routes().get()[0].pattern, "works/:id/");
}

#[test]
fn scope_when_nested_then_it_matches_inside_the_parents_splat() {
    let history = History::in_memory();
    let mut context = RouterContext::new();

    let parent = context.enter_scope(&history, "/app");
    parent.register_route(Some("/users/*"));

    let child = context.enter_scope(&history, "/");
    let detail = child.register_route(Some(":id"));

    let seen: Rc<RefCell<Vec<Option<RouteMatch>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = child
        .active_route()
        .subscribe(move |active: &Option<RouteMatch>| sink.borrow_mut().push(active.clone()));

    history.navigate("/app/users/42", NavigateOptions::default());

    let base = child.base().get();
    assert_eq!(base.path, "app/users/");
    assert_eq!(base.uri, "/app/users");

    let found = child
        .active_route()
        .get()
        .expect("child route should match inside the splat");
    assert_eq!(found.route.handle, detail);
    assert_eq!(found.params.get("id").map(String::as_str), Some("42"));
    assert_eq!(found.uri, "/app/users/42");
}

#[test]
fn context_when_no_scope_is_open_then_lookups_fail() {
    let mut context = RouterContext::new();

    assert_eq!(context.current().err(), Some(ContextError::NoActiveScope));
    assert_eq!(
        context.exit_scope().err(),
        Some(ContextError::NoActiveScope)
    );
}

#[test]
fn context_when_scopes_open_and_close_then_depth_tracks_the_stack() {
    let history = History::in_memory();
    let mut context = RouterContext::new();
    assert_eq!(context.depth(), 0);

    context.enter_scope(&history, "/");
    context.enter_scope(&history, "/");
    assert_eq!(context.depth(), 2);

    context.exit_scope().expect("inner scope is open");
    assert_eq!(context.depth(), 1);
    assert!(context.current().is_ok());

    context.exit_scope().expect("root scope is open");
    assert_eq!(context.depth(), 0);
}
