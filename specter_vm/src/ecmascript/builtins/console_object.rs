// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `console` namespace object and the value inspector used to render
//! objects for host output.
//!
//! Inspection only reads data properties straight from object storage; it
//! never calls getters or proxy traps, so rendering a value cannot run
//! script code.

use crate::ecmascript::{
    abstract_operations::{testing_and_comparison::is_callable, type_conversion::to_rust_string},
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin,
        control_abstraction_objects::promise_objects::PromiseState,
    },
    execution::{Agent, JsResult, Realm},
    types::{Object, ObjectKind, PropertyKey, PropertyValue, Symbol, Value},
};

pub(crate) struct ConsoleObject;

macro_rules! console_method {
    ($name:ident, $js_name:literal, $level:literal) => {
        struct $name;
        impl Builtin for $name {
            const NAME: &'static str = $js_name;
            const LENGTH: u8 = 0;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _, arguments| {
                ConsoleObject::write(agent, $level, arguments)
            });
        }
    };
}

console_method!(ConsoleLog, "log", "log");
console_method!(ConsoleInfo, "info", "info");
console_method!(ConsoleWarn, "warn", "warn");
console_method!(ConsoleError, "error", "error");
console_method!(ConsoleDebug, "debug", "debug");

impl ConsoleObject {
    /// Format the arguments the way `print` does, except that objects are
    /// inspected instead of converted with ToString, and hand the line to
    /// the host.
    fn write(agent: &Agent, level: &'static str, arguments: ArgumentsList) -> JsResult<Value> {
        let mut parts = Vec::with_capacity(arguments.len());
        for argument in arguments.iter() {
            let part = match argument {
                Value::Object(_) => inspect(agent, *argument),
                Value::Symbol(_) | Value::BigInt(_) => argument.to_display_string(agent),
                _ => to_rust_string(agent, *argument)?,
            };
            parts.push(part);
        }
        tracing::trace!(event = "console_write", level, arguments = arguments.len());
        agent.host_hooks().print(&parts.join(" "));
        Ok(Value::Undefined)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.console();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(6)
            .with_prototype(intrinsics.object_prototype())
            .with_builtin_function_property::<ConsoleDebug>()
            .with_builtin_function_property::<ConsoleError>()
            .with_builtin_function_property::<ConsoleInfo>()
            .with_builtin_function_property::<ConsoleLog>()
            .with_builtin_function_property::<ConsoleWarn>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "console"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

/// Objects nested deeper than this are abbreviated.
const MAX_DEPTH: usize = 2;
const MAX_ARRAY_ITEMS: u32 = 100;

/// Render a value for human consumption.
pub(crate) fn inspect(agent: &Agent, value: Value) -> String {
    let mut inspector = Inspector {
        agent,
        seen: Vec::new(),
    };
    match value {
        Value::String(string) => string.to_rust_string(agent),
        _ => inspector.value(value, 0),
    }
}

struct Inspector<'a> {
    agent: &'a Agent,
    /// Objects currently being rendered, outermost first.
    seen: Vec<Object>,
}

impl Inspector<'_> {
    fn value(&mut self, value: Value, depth: usize) -> String {
        let agent = self.agent;
        match value {
            Value::String(string) => quote(&string.to_rust_string(agent)),
            Value::Object(object) => self.object(object, depth),
            _ => value.to_display_string(agent),
        }
    }

    fn object(&mut self, object: Object, depth: usize) -> String {
        if self.seen.contains(&object) {
            return "[Circular]".to_owned();
        }
        if let ObjectKind::Proxy(data) = &self.agent.object(object).kind
            && let Some(target) = data.target
        {
            return self.object(target, depth);
        }
        if is_callable(self.agent, Value::Object(object)) {
            return self.function(object);
        }
        if object.is_error(self.agent) {
            return self.error(object);
        }
        if depth > MAX_DEPTH {
            return if object.is_array_exotic(self.agent) {
                "[Array]".to_owned()
            } else {
                "[Object]".to_owned()
            };
        }
        self.seen.push(object);
        let rendered = self.container(object, depth);
        self.seen.pop();
        rendered
    }

    fn container(&mut self, object: Object, depth: usize) -> String {
        let agent = self.agent;
        enum Shape {
            Array,
            Promise(Option<Result<Value, Value>>),
            Keyed(&'static str, Vec<(Value, Value)>),
            Wrapper(Value),
            #[cfg(feature = "regexp")]
            Literal(String),
            Plain,
        }
        let shape = match &agent.object(object).kind {
            ObjectKind::Array => Shape::Array,
            ObjectKind::Promise(data) => Shape::Promise(match data.state {
                PromiseState::Pending { .. } => None,
                PromiseState::Fulfilled(value) => Some(Ok(value)),
                PromiseState::Rejected(reason) => Some(Err(reason)),
            }),
            ObjectKind::Map(data) => Shape::Keyed("Map", data.entries().collect()),
            ObjectKind::Set(data) => Shape::Keyed("Set", data.entries().collect()),
            ObjectKind::PrimitiveWrapper(value) => Shape::Wrapper(*value),
            #[cfg(feature = "regexp")]
            ObjectKind::RegExp(data) => Shape::Literal(data.display(agent)),
            _ => Shape::Plain,
        };
        match shape {
            Shape::Array => {
                let mut items = Vec::new();
                let mut holes = 0;
                let length =
                    match data_property(agent, object, PropertyKey::from_str(agent, "length")) {
                        Some(Value::Number(length)) => length as u32,
                        _ => 0,
                    };
                for index in 0..length.min(MAX_ARRAY_ITEMS) {
                    let Some(property) = object.property_slot(agent, PropertyKey::Integer(index))
                    else {
                        holes += 1;
                        continue;
                    };
                    if holes > 0 {
                        items.push(empty_items(holes));
                        holes = 0;
                    }
                    items.push(match property.value {
                        PropertyValue::Data { value, .. } => self.value(value, depth + 1),
                        PropertyValue::Accessor { .. } => "[Getter/Setter]".to_owned(),
                    });
                }
                if holes > 0 {
                    items.push(empty_items(holes));
                }
                if length > MAX_ARRAY_ITEMS {
                    items.push(format!("... {} more items", length - MAX_ARRAY_ITEMS));
                }
                items.extend(self.properties(object, depth, true));
                if items.is_empty() {
                    "[]".to_owned()
                } else {
                    format!("[ {} ]", items.join(", "))
                }
            }
            Shape::Promise(state) => {
                let inner = match state {
                    None => "<pending>".to_owned(),
                    Some(Ok(value)) => self.value(value, depth + 1),
                    Some(Err(reason)) => format!("<rejected> {}", self.value(reason, depth + 1)),
                };
                format!("Promise {{ {inner} }}")
            }
            Shape::Keyed(name, entries) => {
                let size = entries.len();
                let items: Vec<String> = entries
                    .into_iter()
                    .map(|(key, value)| {
                        if name == "Map" {
                            format!(
                                "{} => {}",
                                self.value(key, depth + 1),
                                self.value(value, depth + 1)
                            )
                        } else {
                            self.value(key, depth + 1)
                        }
                    })
                    .collect();
                if items.is_empty() {
                    format!("{name}({size}) {{}}")
                } else {
                    format!("{name}({size}) {{ {} }}", items.join(", "))
                }
            }
            Shape::Wrapper(value) => {
                let kind = match value {
                    Value::Boolean(_) => "Boolean",
                    Value::Number(_) => "Number",
                    Value::String(_) => "String",
                    Value::Symbol(_) => "Symbol",
                    _ => "BigInt",
                };
                format!("[{kind}: {}]", self.value(value, depth + 1))
            }
            #[cfg(feature = "regexp")]
            Shape::Literal(literal) => literal,
            Shape::Plain => {
                let items = self.properties(object, depth, false);
                let prefix = self.prefix(object);
                match (prefix.is_empty(), items.is_empty()) {
                    (true, true) => "{}".to_owned(),
                    (false, true) => format!("{prefix} {{}}"),
                    (true, false) => format!("{{ {} }}", items.join(", ")),
                    (false, false) => format!("{prefix} {{ {} }}", items.join(", ")),
                }
            }
        }
    }

    /// Own enumerable properties rendered as `key: value`.
    fn properties(&mut self, object: Object, depth: usize, skip_indices: bool) -> Vec<String> {
        let agent = self.agent;
        let mut items = Vec::new();
        for key in object.storage_keys(agent) {
            if skip_indices && key.as_array_index().is_some() {
                continue;
            }
            let Some(property) = object.property_slot(agent, key) else {
                continue;
            };
            if !property.enumerable {
                continue;
            }
            let name = render_key(agent, key);
            let rendered = match property.value {
                PropertyValue::Data { value, .. } => self.value(value, depth + 1),
                PropertyValue::Accessor {
                    get: Some(_),
                    set: Some(_),
                } => "[Getter/Setter]".to_owned(),
                PropertyValue::Accessor { get: Some(_), .. } => "[Getter]".to_owned(),
                PropertyValue::Accessor { .. } => "[Setter]".to_owned(),
            };
            items.push(format!("{name}: {rendered}"));
        }
        items
    }

    /// Constructor name prefix for objects that are not plain objects.
    fn prefix(&self, object: Object) -> String {
        let agent = self.agent;
        let Some(prototype) = object.prototype_slot(agent) else {
            return "[Object: null prototype]".to_owned();
        };
        let constructor = prototype
            .property_slot(agent, PropertyKey::from_str(agent, "constructor"))
            .and_then(|property| match property.value {
                PropertyValue::Data {
                    value: Value::Object(constructor),
                    ..
                } => Some(constructor),
                _ => None,
            });
        let name = constructor
            .and_then(|constructor| function_name(agent, constructor))
            .unwrap_or_default();
        let tag = data_property(agent, object, PropertyKey::Symbol(Symbol::TO_STRING_TAG))
            .and_then(|tag| tag.as_string())
            .map(|tag| tag.to_rust_string(agent));
        match (name.as_str(), tag) {
            ("Object", None) => String::new(),
            ("Object" | "", Some(tag)) => format!("Object [{tag}]"),
            (name, Some(tag)) if name != tag => format!("{name} [{tag}]"),
            (name, _) => name.to_owned(),
        }
    }

    fn function(&self, object: Object) -> String {
        let agent = self.agent;
        let class = matches!(
            &agent.object(object).kind,
            ObjectKind::ECMAScriptFunction(data) if data.is_class_constructor
        );
        let kind = if class { "class" } else { "Function" };
        match function_name(agent, object) {
            Some(name) if !name.is_empty() => format!("[{kind}: {name}]"),
            _ => format!("[{kind} (anonymous)]"),
        }
    }

    fn error(&self, object: Object) -> String {
        let agent = self.agent;
        let read = |key: &str| {
            data_property(agent, object, PropertyKey::from_str(agent, key))
                .map(|value| match value {
                    Value::String(string) => string.to_rust_string(agent),
                    Value::Undefined => String::new(),
                    value => value.to_display_string(agent),
                })
                .unwrap_or_default()
        };
        let name = read("name");
        let message = read("message");
        match (name.is_empty(), message.is_empty()) {
            (_, true) if name.is_empty() => "Error".to_owned(),
            (_, true) => name,
            (true, false) => message,
            (false, false) => format!("{name}: {message}"),
        }
    }
}

/// Look up a data property along the prototype chain without invoking any
/// internal method that could run code.
fn data_property(agent: &Agent, object: Object, key: PropertyKey) -> Option<Value> {
    let mut current = Some(object);
    while let Some(object) = current {
        if matches!(agent.object(object).kind, ObjectKind::Proxy(_)) {
            return None;
        }
        if let Some(property) = object.property_slot(agent, key) {
            return match property.value {
                PropertyValue::Data { value, .. } => Some(value),
                PropertyValue::Accessor { .. } => None,
            };
        }
        current = object.prototype_slot(agent);
    }
    None
}

fn function_name(agent: &Agent, function: Object) -> Option<String> {
    match function.property_slot(agent, PropertyKey::from_str(agent, "name"))?.value {
        PropertyValue::Data {
            value: Value::String(name),
            ..
        } => Some(name.to_rust_string(agent)),
        _ => None,
    }
}

fn render_key(agent: &Agent, key: PropertyKey) -> String {
    match key {
        PropertyKey::Integer(index) => format!("'{index}'"),
        PropertyKey::String(string) => {
            let name = string.to_rust_string(agent);
            if is_identifier(&name) {
                name
            } else {
                quote(&name)
            }
        }
        PropertyKey::Symbol(symbol) => {
            format!("[{}]", symbol.descriptive_string(agent).to_rust_string(agent))
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

fn empty_items(count: u32) -> String {
    if count == 1 {
        "<1 empty item>".to_owned()
    } else {
        format!("<{count} empty items>")
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::ecmascript::execution::{
        Agent,
        agent::{HostHooks, Options},
    };

    #[derive(Debug, Default)]
    struct CapturingHooks {
        lines: RefCell<Vec<String>>,
    }

    impl HostHooks for CapturingHooks {
        fn print(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_owned());
        }
    }

    fn console_output(source: &str) -> Vec<String> {
        let source = source.to_owned();
        std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(move || {
                let hooks = Rc::new(CapturingHooks::default());
                let agent = Agent::new(Options::default(), hooks.clone());
                let realm = agent.create_realm();
                let script = specter_ast::parse_script(&source, false).unwrap();
                if let Err(error) = realm.evaluate_script(&agent, script) {
                    panic!("script failed: {}", error.to_display_string(&agent));
                }
                hooks.lines.take()
            })
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn primitives_are_printed_like_print() {
        assert_eq!(
            console_output("console.log('a', 1, true, null, undefined, 2n)"),
            vec!["a 1 true null undefined 2n"]
        );
    }

    #[test]
    fn every_level_routes_to_the_host() {
        assert_eq!(
            console_output(
                "console.info('i'); console.warn('w'); console.error('e'); console.debug('d');"
            ),
            vec!["i", "w", "e", "d"]
        );
    }

    #[test]
    fn objects_are_inspected() {
        assert_eq!(
            console_output(
                "console.log({ a: 1, 'b-c': 's' }, [1, , 'x'], function foo() {}, () => {})"
            ),
            vec!["{ a: 1, 'b-c': 's' } [ 1, <1 empty item>, 'x' ] [Function: foo] [Function (anonymous)]"]
        );
        assert_eq!(
            console_output("class Point { constructor() { this.x = 1; } } console.log(new Point(), Point)"),
            vec!["Point { x: 1 } [class: Point]"]
        );
    }

    #[test]
    fn inspection_does_not_call_getters() {
        assert_eq!(
            console_output(
                "var calls = 0;
                 console.log({ get g() { calls++; return 1; }, set s(v) {} });
                 console.log(calls);"
            ),
            vec!["{ g: [Getter], s: [Setter] }", "0"]
        );
    }

    #[test]
    fn cycles_and_depth_are_abbreviated() {
        assert_eq!(
            console_output("var o = { name: 'o' }; o.self = o; console.log(o)"),
            vec!["{ name: 'o', self: [Circular] }"]
        );
        assert_eq!(
            console_output("console.log({ a: { b: { c: { d: 1 } } } })"),
            vec!["{ a: { b: { c: [Object] } } }"]
        );
    }

    #[test]
    fn builtin_objects_have_dedicated_renderings() {
        assert_eq!(
            console_output(
                "console.log(new Map([[1, 'a']]), new Set([1, 2]), new Number(3), new Error('boom'));
                 console.log(Promise.resolve(1), Promise.reject(2), new Promise(() => {}));
                 console.log(Object.create(null));"
            ),
            vec![
                "Map(1) { 1 => 'a' } Set(2) { 1, 2 } [Number: 3] Error: boom",
                "Promise { 1 } Promise { <rejected> 2 } Promise { <pending> }",
                "[Object: null prototype] {}",
            ]
        );
    }

    #[cfg(feature = "regexp")]
    #[test]
    fn regexps_render_as_literals() {
        assert_eq!(console_output("console.log(/a\\/b/gi, [/x/])"), vec!["/a\\/b/gi [ /x/ ]"]);
    }
}
