//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};

use dataset_captioner::{CaptionOutcome, CaptionService};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Canned captioner: returns the queued outcomes in order and records how
/// many images it was asked about.
pub struct FakeCaptioner {
    outcomes: RefCell<Vec<CaptionOutcome>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeCaptioner {
    pub fn new(outcomes: Vec<CaptionOutcome>) -> Self {
        let mut outcomes = outcomes;
        outcomes.reverse();
        Self {
            outcomes: RefCell::new(outcomes),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn captioning(captions: &[&str]) -> Self {
        Self::new(
            captions
                .iter()
                .map(|c| CaptionOutcome::Captioned(c.to_string()))
                .collect(),
        )
    }
}

impl CaptionService for FakeCaptioner {
    fn caption(&self, image_b64: &str) -> CaptionOutcome {
        self.calls.borrow_mut().push(image_b64.to_string());
        self.outcomes
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| CaptionOutcome::Failed("no canned outcome left".to_string()))
    }
}

pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

pub fn write_allow_list(path: &Path, names: &[&str]) {
    fs::write(path, serde_json::to_string(names).unwrap()).unwrap();
}

/// Minimal HTTP/1.1 responder: answers one connection per canned response,
/// then hands back the raw requests it saw.
pub struct OneShotServer {
    pub url: String,
    handle: JoinHandle<Vec<String>>,
}

impl OneShotServer {
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!(
            "http://{}/v1/chat/completions",
            listener.local_addr().unwrap()
        );

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_request(&mut stream));

                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });

        Self { url, handle }
    }

    pub fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_request(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub fn chat_response(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
    .to_string()
}
