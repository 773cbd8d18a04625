//! Greeter fixture for end-to-end lifecycle tests.
//!
//! The install and upgrade argument is an optional `opt text` greeting. An
//! empty argument blob is accepted too, which is why argument decoding is
//! done by hand instead of through the `init` attribute.

use std::cell::RefCell;

const DEFAULT_GREETER: &str = "Hello";
const DEFAULT_GREETED: &str = "World";

thread_local! {
    static GREETER: RefCell<String> = RefCell::new(DEFAULT_GREETER.to_string());
}

fn set_greeter_from_arg() {
    let raw = ic_cdk::api::msg_arg_data();

    let greeter = if raw.is_empty() {
        None
    } else {
        match candid::decode_args::<(Option<String>,)>(&raw) {
            Ok((greeter,)) => greeter,
            Err(err) => ic_cdk::trap(format!("could not decode install argument: {err}")),
        }
    };
    let greeter = greeter.unwrap_or_else(|| DEFAULT_GREETER.to_string());

    ic_cdk::println!("greeter set to {greeter}");
    GREETER.with_borrow_mut(|g| *g = greeter);
}

#[unsafe(export_name = "canister_init")]
extern "C" fn init() {
    set_greeter_from_arg();
}

#[unsafe(export_name = "canister_post_upgrade")]
extern "C" fn post_upgrade() {
    set_greeter_from_arg();
}

#[ic_cdk::query]
fn hello(greeted: Option<String>) -> String {
    let greeter = GREETER.with_borrow(Clone::clone);
    let greeted = greeted.unwrap_or_else(|| DEFAULT_GREETED.to_string());

    format!("{greeter}, {greeted}!")
}
