use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;

use crate::config::{ChatSettings, OutboundPolicy};
use crate::connection::{ConnectionState, SendOutcome};
use crate::message::Role;
use crate::session::{ChatSession, SessionEvent};
use crate::transport::Relay;

fn settings(endpoint: String, outbound: OutboundPolicy) -> ChatSettings {
    ChatSettings {
        endpoint,
        reconnect_delay_ms: 100,
        outbound,
    }
}

async fn start_relay(listener: TcpListener) -> Relay {
    let relay = Relay::new();
    tokio::spawn(relay.clone().serve(listener));
    relay
}

async fn wait_for_peers(relay: &Relay, count: usize) {
    timeout(Duration::from_secs(5), async {
        while relay.peer_count() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("peers did not register");
}

async fn next_text(session: &mut ChatSession) -> String {
    timeout(Duration::from_secs(5), async {
        loop {
            match session.next_event().await {
                Some(SessionEvent::Message(message)) => return message.text,
                Some(SessionEvent::Connection(_)) => continue,
                None => panic!("session ended"),
            }
        }
    })
    .await
    .expect("no message arrived")
}

#[tokio::test]
async fn doctor_and_pharmacist_chat_through_relay() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let relay = start_relay(listener).await;

    let mut doctor =
        ChatSession::connect(&settings(url.clone(), OutboundPolicy::Drop), Role::Doctor);
    let mut pharmacist =
        ChatSession::connect(&settings(url, OutboundPolicy::Drop), Role::Pharmacist);
    assert!(doctor.wait_until_open().await);
    assert!(pharmacist.wait_until_open().await);
    wait_for_peers(&relay, 2).await;

    let (_, outcome) = doctor.submit("Is paracetamol in stock?").unwrap();
    assert_eq!(outcome, SendOutcome::Sent);
    assert_eq!(next_text(&mut pharmacist).await, "Is paracetamol in stock?");

    pharmacist.submit("Yes, 40 strips").unwrap();
    assert_eq!(next_text(&mut doctor).await, "Yes, 40 strips");

    let doctor_view: Vec<Role> = doctor.messages().iter().map(|m| m.sender).collect();
    let pharmacist_view: Vec<Role> = pharmacist.messages().iter().map(|m| m.sender).collect();
    assert_eq!(doctor_view, vec![Role::Doctor, Role::Pharmacist]);
    assert_eq!(pharmacist_view, vec![Role::Doctor, Role::Pharmacist]);

    doctor.close().await;
    pharmacist.close().await;
}

#[tokio::test]
async fn session_recovers_when_relay_comes_up_late() {
    let reserved = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = reserved.local_addr().unwrap();
    drop(reserved);
    let url = format!("ws://{addr}");

    let mut doctor_settings = settings(url.clone(), OutboundPolicy::Buffer);
    doctor_settings.reconnect_delay_ms = 1000;
    let mut doctor = ChatSession::connect(&doctor_settings, Role::Doctor);

    timeout(Duration::from_secs(5), async {
        let closed = Some(SessionEvent::Connection(ConnectionState::Closed));
        while doctor.next_event().await != closed {}
    })
    .await
    .expect("first attempt should fail");

    let (_, outcome) = doctor.submit("queued while offline").unwrap();
    assert_eq!(outcome, SendOutcome::Queued);

    let listener = TcpListener::bind(addr).await.unwrap();
    let relay = start_relay(listener).await;

    let mut pharmacist =
        ChatSession::connect(&settings(url, OutboundPolicy::Drop), Role::Pharmacist);
    assert!(pharmacist.wait_until_open().await);
    wait_for_peers(&relay, 1).await;

    // the pharmacist is registered well before the doctor's next attempt,
    // which flushes the queued frame
    assert_eq!(next_text(&mut pharmacist).await, "queued while offline");
    assert_eq!(doctor.connection_state(), ConnectionState::Open);

    doctor.close().await;
    pharmacist.close().await;
}
