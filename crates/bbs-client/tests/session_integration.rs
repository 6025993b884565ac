//! End-to-end tests of the session engine against a real loopback server.
//!
//! Each test binds a `TcpListener` on `127.0.0.1:0` and plays the server side
//! by hand, so the exact bytes the client writes can be checked.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use bbs_client::application::{
    ConnectForm, ConnectionStatus, Flow, FormController, Session, SessionController,
};
use bbs_client::domain::display::{DISCONNECTED_NOTICE, UNKNOWN_COMMAND_NOTICE};
use bbs_client::domain::{ClientConfig, RecordingSink};

const TIMEOUT: Duration = Duration::from_secs(5);

// ── Helpers ───────────────────────────────────────────────────────────────────

async fn listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn terminal_controller() -> (SessionController, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let session = Session::new(ClientConfig::default(), sink.clone());
    (SessionController::new(session), sink)
}

/// Connects the controller through its `%connect` command and returns the
/// accepted server-side socket.
async fn connect(controller: &SessionController, listener: &TcpListener, port: u16) -> TcpStream {
    let flow = controller
        .handle(&format!("%connect 127.0.0.1 {port}"))
        .await;
    assert_eq!(flow, Flow::Continue);
    let (socket, _) = tokio::time::timeout(TIMEOUT, listener.accept())
        .await
        .expect("client must connect")
        .unwrap();
    socket
}

async fn read_exactly(socket: &mut TcpStream, expected: &[u8]) {
    let mut buf = vec![0u8; expected.len()];
    tokio::time::timeout(TIMEOUT, socket.read_exact(&mut buf))
        .await
        .expect("expected bytes from the client")
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&buf), String::from_utf8_lossy(expected));
}

async fn assert_silent(socket: &mut TcpStream) {
    let mut buf = [0u8; 1];
    let read = tokio::time::timeout(Duration::from_millis(150), socket.read(&mut buf)).await;
    assert!(read.is_err(), "client must not write anything");
}

async fn wait_for_lines(sink: &RecordingSink, count: usize) {
    tokio::time::timeout(TIMEOUT, async {
        while sink.lines().len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("display lines did not arrive");
}

async fn wait_for_disconnect(session: &Session) {
    let mut status = session.subscribe();
    tokio::time::timeout(
        TIMEOUT,
        status.wait_for(|s| *s == ConnectionStatus::Disconnected),
    )
    .await
    .expect("session must disconnect")
    .unwrap();
}

// ── Terminal flow ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_terminal_session() {
    // Arrange
    let (listener, port) = listener().await;
    let (controller, sink) = terminal_controller();

    // Act / Assert: connect
    let mut server = connect(&controller, &listener, port).await;
    assert_eq!(
        sink.lines(),
        vec![format!("connected to 127.0.0.1 on port {port}")]
    );

    // The server greets; the text is shown followed by the prompt marker
    server.write_all(b"Enter a username: ").await.unwrap();
    wait_for_lines(&sink, 2).await;
    assert_eq!(sink.lines()[1], "Enter a username: \n> ");

    // First free text is the username, sent raw
    controller.handle("alice").await;
    read_exactly(&mut server, b"alice").await;

    // Further free text is rejected locally
    controller.handle("hello everyone").await;
    assert_eq!(sink.lines().last().unwrap(), UNKNOWN_COMMAND_NOTICE);

    // Structured requests
    controller.handle("%join").await;
    read_exactly(&mut server, br#"{"command":"%groupjoin","group":"default"}"#).await;
    controller.handle("%groupmessage teamA 3").await;
    read_exactly(
        &mut server,
        br#"{"command":"%groupmessage","group":"teamA","message_id":3}"#,
    )
    .await;

    // Exit: one last write, then the socket is closed
    let flow = controller.handle("%exit").await;
    assert_eq!(flow, Flow::Exit);
    let mut rest = Vec::new();
    tokio::time::timeout(TIMEOUT, server.read_to_end(&mut rest))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rest, br#"{"command":"%exit"}"#);
    assert!(!controller.session().is_running().await);
    assert!(!controller.session().is_connected().await);
    assert_eq!(sink.count(DISCONNECTED_NOTICE), 0);
}

#[tokio::test]
async fn test_validation_error_writes_nothing() {
    let (listener, port) = listener().await;
    let (controller, sink) = terminal_controller();
    let mut server = connect(&controller, &listener, port).await;

    controller.handle("%groupmessage teamA notanumber").await;

    assert_silent(&mut server).await;
    assert_eq!(
        sink.lines().last().unwrap(),
        "usage: %groupmessage <group_name> <message_id>"
    );
}

#[tokio::test]
async fn test_server_close_is_reported_once() {
    // Arrange
    let (listener, port) = listener().await;
    let (controller, sink) = terminal_controller();
    let server = connect(&controller, &listener, port).await;

    // Act
    drop(server);
    wait_for_disconnect(controller.session()).await;

    // Assert
    assert_eq!(sink.count(DISCONNECTED_NOTICE), 1);
    assert!(!controller.session().is_running().await);

    // Later commands see no connection; exit still ends the loop
    controller.handle("%groups").await;
    assert_eq!(sink.lines().last().unwrap(), "not connected to server");
    assert_eq!(controller.handle("%exit").await, Flow::Exit);
    assert_eq!(sink.count(DISCONNECTED_NOTICE), 1);
}

#[tokio::test]
async fn test_connect_notice_precedes_immediate_greeting() {
    // Repeated because the greeting races the notice on a real socket.
    for _ in 0..20 {
        // Arrange: a server that greets the moment it accepts
        let (listener, port) = listener().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"Enter a username: ").await.unwrap();
            socket
        });
        let (controller, sink) = terminal_controller();

        // Act
        controller
            .handle(&format!("%connect 127.0.0.1 {port}"))
            .await;
        let _socket = tokio::time::timeout(TIMEOUT, server)
            .await
            .expect("server must accept")
            .unwrap();
        wait_for_lines(&sink, 2).await;

        // Assert
        let lines = sink.lines();
        assert_eq!(lines[0], format!("connected to 127.0.0.1 on port {port}"));
        assert_eq!(lines[1], "Enter a username: \n> ");
        controller.handle("%exit").await;
    }
}

#[tokio::test]
async fn test_connect_failure_then_retry() {
    // Arrange: a port with nothing listening on it
    let (closed, closed_port) = listener().await;
    drop(closed);
    let (controller, sink) = terminal_controller();

    // Act
    controller
        .handle(&format!("%connect 127.0.0.1 {closed_port}"))
        .await;

    // Assert: reported, and the session is usable for another attempt
    assert!(sink.lines()[0].starts_with("could not connect to server: "));
    assert!(!controller.session().is_connected().await);

    let (listener, port) = listener().await;
    let _server = connect(&controller, &listener, port).await;
    assert!(controller.session().is_running().await);
}

#[tokio::test]
async fn test_reconnect_after_server_close_resets_username() {
    // Arrange: first connection sends a username, then the server drops it
    let (first_listener, first_port) = listener().await;
    let (controller, _sink) = terminal_controller();
    let mut first = connect(&controller, &first_listener, first_port).await;
    controller.handle("alice").await;
    read_exactly(&mut first, b"alice").await;
    drop(first);
    wait_for_disconnect(controller.session()).await;

    // Act: connect somewhere else
    let (second_listener, second_port) = listener().await;
    let mut second = connect(&controller, &second_listener, second_port).await;
    controller.handle("bob").await;

    // Assert: the new connection gets its own username
    read_exactly(&mut second, b"bob").await;
}

// ── Form flow ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_form_connect_sends_username_immediately() {
    // Arrange
    let (listener, port) = listener().await;
    let sink = Arc::new(RecordingSink::new());
    let form = FormController::new(Session::new(ClientConfig::form(), sink.clone()));

    // Act
    form.connect(&ConnectForm::new("127.0.0.1", port.to_string(), " alice "))
        .await
        .unwrap();
    let (mut server, _) = listener.accept().await.unwrap();

    // Assert
    read_exactly(&mut server, b"alice").await;
    assert!(sink.lines().contains(&format!("Connected to 127.0.0.1:{port}")));
    assert!(sink
        .lines()
        .contains(&"Username 'alice' sent to server.".to_string()));

    form.list_users("teamA").await.unwrap();
    read_exactly(&mut server, br#"{"command":"%groupusers","group":"teamA"}"#).await;

    // Inbound text is shown without a prompt marker
    server.write_all(b"Welcome").await.unwrap();
    wait_for_lines(&sink, 4).await;
    assert_eq!(sink.lines().last().unwrap(), "Welcome");
}

#[tokio::test]
async fn test_form_reports_server_close_in_form_wording() {
    // Arrange
    let (listener, port) = listener().await;
    let sink = Arc::new(RecordingSink::new());
    let form = FormController::new(Session::new(ClientConfig::form(), sink.clone()));
    form.connect(&ConnectForm::new("127.0.0.1", port.to_string(), "alice"))
        .await
        .unwrap();
    let (mut server, _) = listener.accept().await.unwrap();
    read_exactly(&mut server, b"alice").await;

    // Act
    drop(server);
    wait_for_disconnect(form.session()).await;

    // Assert
    assert_eq!(sink.count("Server disconnected."), 1);
    assert_eq!(sink.count(DISCONNECTED_NOTICE), 0);
}
