// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of caller identifiers for testing.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// A contact payload that passes validation.
pub fn valid_contact(i: usize) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "name": format!("Client {}", i),
        "email": format!("client{}@example.com", i),
        "message": format!("Looking for an editor for project number {}.", i),
        "budget": "5k-10k",
    }))
    .unwrap()
}

/// A review payload that passes validation.
pub fn valid_review(i: usize) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "name": format!("Reviewer {}", i),
        "rating": (i % 5) + 1,
        "comment": format!("Delivered cut number {} ahead of schedule.", i),
    }))
    .unwrap()
}

/// A payload with the honeypot filled and junk everywhere else.
pub fn spam_payload(i: usize) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "name": "",
        "email": "spam",
        "message": "buy",
        "rating": 99,
        "honeypot": format!("http://spam-{}.example.net", i),
    }))
    .unwrap()
}

/// Payloads that fail validation in different fields.
pub fn invalid_payload(i: usize) -> Vec<u8> {
    let variants = [
        json!({}),
        json!({"name": "X", "email": "x@y.com", "message": "Long enough message"}),
        json!({"name": "Xavier", "email": "no-at-sign", "message": "Long enough message"}),
        json!({"name": "Xavier", "email": "x@y", "message": "Long enough message", "comment": "Long enough comment"}),
        json!({"name": "Xavier", "email": "x@y.com", "message": "short", "comment": "short"}),
        json!({"name": "   ", "email": "x@y.com", "message": "Long enough message"}),
    ];
    serde_json::to_vec(&variants[i % variants.len()]).unwrap()
}

/// Free text carrying markup and script injection attempts.
pub fn generate_hostile_strings() -> Vec<&'static str> {
    vec![
        "<script>alert('x')</script> please call me back",
        "<img src=x onerror=alert(1)> nice reel",
        "Normal text with a stray > and < inside",
        "<<<<>>>> bracket storm followed by words",
        "&lt;already escaped&gt; stays as is, ok",
        "\u{3c}svg onload=alert(1)\u{3e} unicode escapes",
    ]
}

/// Phone inputs paired with whether they should be accepted.
pub fn generate_phone_variants() -> Vec<(&'static str, bool)> {
    vec![
        ("", true),
        ("+1 555 1234567", true),
        ("+44 20 79460958", true),
        ("(555)123-4567", true),
        ("555.123.4567", true),
        ("12345", true),
        ("phone", false),
        ("555-123-4567 x12", false),
        ("+1-555-<script>", false),
        ("++1 555 1234", false),
        ("1234567890123456789", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_clients() {
        let clients = generate_clients(256);
        assert_eq!(clients.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = clients.iter().collect();
        assert_eq!(unique.len(), 256);
        assert_eq!(clients[1], "10.0.0.1");
    }

    #[test]
    fn test_payloads_are_json_objects() {
        for i in 0..10 {
            for payload in [valid_contact(i), valid_review(i), spam_payload(i), invalid_payload(i)] {
                let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
                assert!(value.is_object());
            }
        }
    }
}
