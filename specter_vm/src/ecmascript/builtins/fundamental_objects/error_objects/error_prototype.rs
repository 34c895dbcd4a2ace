// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{operations_on_objects::get, type_conversion::to_string},
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, ordinary::require_object},
    execution::{Agent, JsResult, Realm},
    types::{HeapString, PropertyKey, Value},
};

pub(crate) struct ErrorPrototype;

struct ErrorPrototypeToString;
impl Builtin for ErrorPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ErrorPrototype::to_string);
}

impl ErrorPrototype {
    /// ### [20.5.3.4 Error.prototype.toString ( )](https://tc39.es/ecma262/#sec-error.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Let O be the this value.
        // 2. If O is not an Object, throw a TypeError exception.
        let o = require_object(agent, this_value, "Error.prototype.toString")?;
        // 3. Let name be ? Get(O, "name").
        let name = get(agent, o, PropertyKey::from_str(agent, "name"))?;
        // 4. If name is undefined, set name to "Error"; otherwise set name to
        // ? ToString(name).
        let name = if name.is_undefined() {
            HeapString::from_str(agent, "Error")
        } else {
            to_string(agent, name)?
        };
        // 5. Let msg be ? Get(O, "message").
        let msg = get(agent, o, PropertyKey::from_str(agent, "message"))?;
        // 6. If msg is undefined, set msg to the empty String; otherwise set
        // msg to ? ToString(msg).
        let msg = if msg.is_undefined() {
            HeapString::from_str(agent, "")
        } else {
            to_string(agent, msg)?
        };
        // 7. If name is the empty String, return msg.
        if name.is_empty(agent) {
            return Ok(Value::String(msg));
        }
        // 8. If msg is the empty String, return name.
        if msg.is_empty(agent) {
            return Ok(Value::String(name));
        }
        // 9. Return the string-concatenation of name, the code unit 0x003A
        // (COLON), the code unit 0x0020 (SPACE), and msg.
        let separator = HeapString::from_str(agent, ": ");
        Ok(Value::String(HeapString::concat(agent, &[name, separator, msg])))
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.error_prototype();
        let message = PropertyKey::from_str(agent, "message");
        let name = PropertyKey::from_str(agent, "name");

        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(4)
            .with_prototype(intrinsics.object_prototype())
            .with_constructor_property(intrinsics.error())
            .with_data_property(message, Value::from_str(agent, ""))
            .with_data_property(name, Value::from_str(agent, "Error"))
            .with_builtin_function_property::<ErrorPrototypeToString>()
            .build();
    }
}
