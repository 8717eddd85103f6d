use std::cell::Cell;
use std::rc::Rc;

use signpost::prelude::*;

mod common;
use common::*;

#[tokio::test]
async fn paths_urls_and_redirects_come_from_registered_patterns() {
    let home = Screen::new(|_: ScreenProps<String>| String::from("home"));
    let user = Screen::new(|_: ScreenProps<String>| String::from("user"));
    let routes = RouteRegistry::new().route("/", &home).route("/users/:id", &user);
    let (mut service, handle) = router(routes, RouterConfig::default());

    service.run_until_stalled().await;
    let routing = handle.routing();

    let context = PathContext::new()
        .with_param("id", "7")
        .with_search("tab", String::from("likes"));
    assert_eq!(routing.path_of(&user, &context), "/users/7?tab=likes");
    assert_eq!(
        routing.url_of(&user, &context),
        "http://localhost/users/7?tab=likes",
    );
    assert_eq!(
        routing.redirect_to(&user, &context),
        "redirect(/users/7?tab=likes)",
    );
}

#[tokio::test]
async fn links_carry_the_active_state_of_the_current_location() {
    let home = Screen::new(|_: ScreenProps<String>| String::from("home"));
    let user = Screen::new(|_: ScreenProps<String>| String::from("user"));
    let routes = RouteRegistry::new().route("/", &home).route("/users/:id", &user);
    let (mut service, handle) = router(
        routes,
        RouterConfig::default().history(MemoryHistory::with_initial_path("/users/7")),
    );

    service.run_until_stalled().await;
    let routing = handle.routing();

    // "/users/7" matches the user pattern, not the home pattern
    let context = PathContext::new().with_param("id", "7");
    assert_eq!(
        routing.link_to(&user, LinkContent::Label(String::from("You")), &context),
        "link(/users/7,true,You)",
    );
    assert_eq!(
        routing.link_to(&home, LinkContent::Label(String::from("Home")), &PathContext::new()),
        "link(/,false,Home)",
    );
}

#[tokio::test]
async fn link_content_forms() {
    let home = Screen::new(|_: ScreenProps<String>| String::from("home"));
    let routes = RouteRegistry::new().route("/", &home);
    let (mut service, handle) = router(routes, RouterConfig::default());

    service.run_until_stalled().await;
    let routing = handle.routing();
    let context = PathContext::new();

    assert_eq!(
        routing.link_to(&home, LinkContent::Element(String::from("<b>go</b>")), &context),
        "link(/,true,<b>go</b>)",
    );
    assert_eq!(
        routing.link_to(
            &home,
            LinkContent::Render(Box::new(|state: LinkState| {
                format!("{}@{}", state.active, state.href)
            })),
            &context,
        ),
        "link(/,true,true@/)",
    );
}

#[tokio::test]
#[should_panic(expected = "no route registered for screen")]
async fn path_of_an_unregistered_screen_panics() {
    let home = Screen::new(|_: ScreenProps<String>| String::from("home"));
    let routes = RouteRegistry::new().route("/", &home);
    let (mut service, handle) = router(routes, RouterConfig::default());
    service.run_until_stalled().await;

    let stranger = Screen::new(|_: ScreenProps<String>| String::from("stranger"));
    handle.routing().path_of(&stranger, &PathContext::new());
}

#[tokio::test]
async fn reload_through_the_toolkit_reaches_the_service() {
    let loads = Rc::new(Cell::new(0));
    let counter = loads.clone();
    let user = Screen::loading(
        |props: ScreenProps<String>| serde_json::to_string(props.props).unwrap(),
        move |_context: LoadContext| {
            counter.set(counter.get() + 1);
            async move { Ok(LoadOutcome::Props(Props::new())) }
        },
    );
    let routes = RouteRegistry::new().route("/users/:id", &user);
    let (mut service, handle) = router(
        routes,
        RouterConfig::default().history(MemoryHistory::with_initial_path("/users/1")),
    );

    service.run_until_stalled().await;
    assert_eq!(loads.get(), 1);

    handle.routing().reload();
    service.run_until_stalled().await;
    assert_eq!(loads.get(), 2);
}
