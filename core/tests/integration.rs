//! Drive `ContactsManager` against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then executes every `Outgoing`
//! request over real HTTP using ureq and resolves it back into the manager,
//! the same way an interactive host would.

use contacts_core::{
    ApiError, Command, ContactsClient, ContactsManager, EntryId, Field, HttpMethod,
    HttpResponse, Outgoing,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data so the core decides what counts as a
/// failure.
fn execute(req: contacts_core::HttpRequest) -> Result<HttpResponse, ApiError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let auth = req.header("authorization").unwrap_or_default().to_string();
    let result = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).header("authorization", &auth).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).header("authorization", &auth).call(),
        (HttpMethod::Post, body) => agent
            .post(&req.url)
            .header("authorization", &auth)
            .content_type("application/json")
            .send(body.unwrap_or_default().as_bytes()),
        (HttpMethod::Put, body) => agent
            .put(&req.url)
            .header("authorization", &auth)
            .content_type("application/json")
            .send(body.unwrap_or_default().as_bytes()),
    };
    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Ok(HttpResponse::new(status, body))
}

fn run(manager: &mut ContactsManager, outgoing: Outgoing) {
    let outcome = execute(outgoing.request);
    manager.resolve(outgoing.ticket, outcome);
}

fn dispatch(manager: &mut ContactsManager, command: Command) {
    if let Some(outgoing) = manager.dispatch(command).unwrap() {
        run(manager, outgoing);
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn fill(manager: &mut ContactsManager, name: &str, phone: &str) {
    for (field, value) in [
        (Field::Name, name.to_string()),
        (Field::Phone, phone.to_string()),
        (Field::Email, format!("{}@example.com", name.to_lowercase())),
        (Field::Address, "1 Infinite Loop".to_string()),
    ] {
        dispatch(manager, Command::SetField(field, value));
    }
}

fn names(manager: &ContactsManager) -> Vec<String> {
    manager
        .store()
        .entries()
        .iter()
        .map(|e| e.details.name.clone())
        .collect()
}

#[test]
fn contacts_lifecycle() {
    let base = start_server();
    let mut alice = ContactsManager::new(ContactsClient::new(&base).unwrap());

    // Log in: the initial load comes back empty.
    dispatch(&mut alice, Command::SetCredential(Some("alice".to_string())));
    assert!(alice.store().is_empty());
    assert_eq!(alice.in_flight(), 0);

    // Create: visible before the response, confirmed after.
    fill(&mut alice, "Ada", "555-0100");
    let outgoing = alice.dispatch(Command::Submit).unwrap().unwrap();
    assert!(alice.store().entries()[0].is_pending());
    run(&mut alice, outgoing);
    let ada = alice.store().entries()[0].id.clone();
    assert!(matches!(ada, EntryId::Saved(_)));
    assert!(alice.form().draft().is_empty());

    fill(&mut alice, "Grace", "555-0199");
    dispatch(&mut alice, Command::Submit);
    assert_eq!(names(&alice), ["Ada", "Grace"]);

    // Update Ada's phone.
    dispatch(&mut alice, Command::BeginEdit(ada.clone()));
    assert_eq!(alice.form().draft().name, "Ada");
    dispatch(&mut alice, Command::SetField(Field::Phone, "555-0111".to_string()));
    dispatch(&mut alice, Command::Submit);
    assert_eq!(alice.form().editing(), None);
    assert_eq!(alice.store().get(&ada).unwrap().details.phone, "555-0111");

    // A reload agrees with what the store already shows.
    let before = alice.store().clone();
    dispatch(&mut alice, Command::Reload);
    assert_eq!(alice.store(), &before);

    // Another session sees nothing.
    let mut bob = ContactsManager::new(ContactsClient::new(&base).unwrap());
    dispatch(&mut bob, Command::SetCredential(Some("bob".to_string())));
    assert!(bob.store().is_empty());

    // Delete Ada; Grace stays.
    dispatch(&mut alice, Command::Delete(ada.clone()));
    assert_eq!(names(&alice), ["Grace"]);
    dispatch(&mut alice, Command::Reload);
    assert_eq!(names(&alice), ["Grace"]);
}

#[test]
fn server_side_failures_are_compensated() {
    let base = start_server();
    let mut manager = ContactsManager::new(ContactsClient::new(&base).unwrap());
    dispatch(&mut manager, Command::SetCredential(Some("carol".to_string())));
    fill(&mut manager, "Ada", "555-0100");
    dispatch(&mut manager, Command::Submit);
    let ada = manager.store().entries()[0].id.clone();

    // The contact disappears behind our back, so update and delete 404.
    let mut other_tab = ContactsManager::new(ContactsClient::new(&base).unwrap());
    dispatch(&mut other_tab, Command::SetCredential(Some("carol".to_string())));
    dispatch(&mut other_tab, Command::Delete(ada.clone()));

    dispatch(&mut manager, Command::BeginEdit(ada.clone()));
    dispatch(&mut manager, Command::SetField(Field::Name, "Ada L.".to_string()));
    dispatch(&mut manager, Command::Submit);
    assert_eq!(manager.store().get(&ada).unwrap().details.name, "Ada");
    assert!(manager.form().editing().is_some());

    dispatch(&mut manager, Command::Delete(ada.clone()));
    assert!(manager.store().contains(&ada));
}

#[test]
fn failed_create_is_rolled_back() {
    let base = start_server();
    // Wrong path prefix: every request 404s.
    let mut manager =
        ContactsManager::new(ContactsClient::new(&format!("{base}/missing/")).unwrap());
    dispatch(&mut manager, Command::SetCredential(Some("dave".to_string())));
    assert!(manager.store().is_empty());

    fill(&mut manager, "Ada", "555-0100");
    let draft = manager.form().draft().clone();
    dispatch(&mut manager, Command::Submit);

    assert!(manager.store().is_empty());
    assert_eq!(manager.form().draft(), &draft);
    assert_eq!(manager.in_flight(), 0);
}

#[test]
fn unreachable_server_is_logged_not_raised() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut manager =
        ContactsManager::new(ContactsClient::new(&format!("http://{addr}")).unwrap());
    dispatch(&mut manager, Command::SetCredential(Some("erin".to_string())));
    assert!(manager.store().is_empty());
    assert_eq!(manager.in_flight(), 0);
}
