//! Terminal front-end for the shop.
//!
//! The host side of the host-does-IO split: renders the current view, maps
//! user input to `Session` operations, executes the resulting requests over
//! HTTP, and feeds the responses back in. One request per user action, no
//! retries; a transport failure ends that action and nothing else.

use std::io::{self, BufRead, Write};

use shop_core::{HttpMethod, HttpRequest, HttpResponse, Session, View};

fn main() -> io::Result<()> {
    env_logger::init();

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SHOP_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    // 4xx/5xx come back as data; the core decides what a status means.
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut session = Session::new(&base_url);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    log::info!("connecting to {base_url}");

    loop {
        match session.view() {
            View::Login => {
                println!("-- Shopping Login --");
                let Some(username) = prompt(&mut lines, "username: ")? else {
                    break;
                };
                let Some(password) = prompt(&mut lines, "password: ")? else {
                    break;
                };
                login(&agent, &mut session, &username, &password);
            }
            View::Items => {
                render_items(&session);
                let Some(line) = prompt(&mut lines, "> ")? else {
                    break;
                };
                if !dispatch(&agent, &mut session, line.trim()) {
                    break;
                }
            }
        }
        for notice in session.drain_notices() {
            println!("{notice}");
        }
        println!();
    }
    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    lines.next().transpose()
}

fn render_items(session: &Session) {
    println!("-- Shopping Items --");
    if session.items().is_empty() {
        println!("  (no items)");
    }
    for item in session.items() {
        println!("  [{}] {} ({})", item.id, item.name, item.status);
    }
    println!("commands: add <item-id> | cart | orders | checkout | refresh | quit");
}

/// Run one items-view command. Returns `false` to exit the loop.
fn dispatch(agent: &ureq::Agent, session: &mut Session, command: &str) -> bool {
    match command.split_once(' ') {
        Some(("add", id)) => match id.trim().parse::<u64>() {
            Ok(item_id) => add_to_cart(agent, session, item_id),
            Err(_) => println!("usage: add <item-id>"),
        },
        None => match command {
            "cart" => {
                if let Ok(response) = execute(agent, session.begin_show_cart()) {
                    session.finish_show_cart(response);
                }
            }
            "orders" => {
                if let Ok(response) = execute(agent, session.begin_show_orders()) {
                    session.finish_show_orders(response);
                }
            }
            "checkout" => {
                if let Some(req) = session.begin_checkout() {
                    if let Ok(response) = execute(agent, req) {
                        session.finish_checkout(response);
                    }
                }
            }
            "refresh" => {
                if let Ok(response) = execute(agent, session.begin_fetch_items()) {
                    session.finish_fetch_items(response);
                }
            }
            "quit" | "q" => return false,
            "" => {}
            other => println!("unknown command: {other}"),
        },
        Some((other, _)) => println!("unknown command: {other}"),
    }
    true
}

fn login(agent: &ureq::Agent, session: &mut Session, username: &str, password: &str) {
    let req = match session.begin_login(username, password) {
        Ok(req) => req,
        Err(err) => {
            println!("login failed: {err}");
            return;
        }
    };
    let Ok(response) = execute(agent, req) else {
        return;
    };
    if let Some(fetch) = session.finish_login(response) {
        if let Ok(response) = execute(agent, fetch) {
            session.finish_fetch_items(response);
        }
    }
}

fn add_to_cart(agent: &ureq::Agent, session: &mut Session, item_id: u64) {
    let req = match session.begin_add_to_cart(item_id) {
        Ok(req) => req,
        Err(err) => {
            println!("add failed: {err}");
            return;
        }
    };
    if let Ok(response) = execute(agent, req) {
        session.finish_add_to_cart(item_id, response);
    }
}

/// Execute a core-built request over HTTP. Transport failures are reported
/// here and abort the triggering action only.
fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let result = match req.method {
        HttpMethod::Get => {
            let mut call = agent.get(&req.path);
            for (name, value) in &req.headers {
                call = call.header(name, value);
            }
            call.call()
        }
        HttpMethod::Post => {
            let mut call = agent.post(&req.path);
            for (name, value) in &req.headers {
                call = call.header(name, value);
            }
            match req.body {
                Some(body) => call.send(body.as_bytes()),
                None => call.send_empty(),
            }
        }
    };

    match result {
        Ok(mut response) => {
            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string().unwrap_or_default();
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body,
            })
        }
        Err(err) => {
            println!("network error: {err}");
            Err(err)
        }
    }
}
