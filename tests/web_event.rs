#![cfg(target_arch = "wasm32")]

use folio_dom::{
	mount::{ElementMount, Root},
	web::{EventDelegate, WebHost},
	Element, Renderer,
};
use serde_json::{json, Value};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

use web_common_::{fresh_container, init_logging};

#[wasm_bindgen_test]
fn click() {
	init_logging();
	let container = fresh_container();
	let host = WebHost::from_window().unwrap();
	let mut renderer = Renderer::new(host.clone());
	let mut root = Root::new(ElementMount::<WebHost>::new(container.clone().into()));

	let button = Element::new("button").unwrap().on("click", json!("step")).child(Element::new("span").unwrap().child("Next"));
	root.render(&mut renderer, &button.into()).unwrap();

	let received = Rc::new(RefCell::new(Vec::<Value>::new()));
	let mut delegate = EventDelegate::new(host, container.into(), Rc::clone(renderer.event_registry()), {
		let received = Rc::clone(&received);
		move |dispatch| received.borrow_mut().push(dispatch.payload)
	});
	delegate.sync();
	assert_eq!(delegate.listeners().references("click"), 1);

	let span: HtmlElement = root.nodes()[0].first_child().unwrap().dyn_into().unwrap();
	assert!(received.borrow().is_empty());
	span.click();
	assert_eq!(*received.borrow(), vec![json!("step")]);

	drop(delegate);
	span.click();
	assert_eq!(received.borrow().len(), 1);
}

#[wasm_bindgen_test]
fn listeners_follow_the_registry() {
	init_logging();
	let container = fresh_container();
	let host = WebHost::from_window().unwrap();
	let mut renderer = Renderer::new(host.clone());
	let mut root = Root::new(ElementMount::<WebHost>::new(container.clone().into()));
	let mut delegate = EventDelegate::new(host, container.into(), Rc::clone(renderer.event_registry()), |_| ());

	root.render(&mut renderer, &Element::new("input").unwrap().on("input", json!(null)).on("change", json!(null)).into()).unwrap();
	delegate.sync();
	assert_eq!(delegate.listeners().event_types().count(), 2);

	root.render(&mut renderer, &Element::new("input").unwrap().on("input", json!(null)).into()).unwrap();
	delegate.sync();
	assert_eq!(delegate.listeners().references("change"), 0);
	assert_eq!(delegate.listeners().len(), 1);
}
