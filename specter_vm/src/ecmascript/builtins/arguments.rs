// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.4 Arguments Exotic Objects](https://tc39.es/ecma262/#sec-arguments-exotic-objects)
//!
//! Most ECMAScript functions make an arguments object available to their
//! code. Depending upon the characteristics of the function definition, its
//! arguments object is either an ordinary object or an arguments exotic
//! object. An arguments exotic object is an exotic object whose array index
//! properties map to the formal parameters bindings of an invocation of its
//! associated ECMAScript function.
//!
//! The \[\[ParameterMap\]\] is kept as a list of parameter names indexed by
//! argument position instead of an object of accessor properties.

use super::ordinary::{
    ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
    ordinary_set,
};
use crate::ecmascript::{
    execution::{Agent, EnvironmentIndex, JsResult},
    types::{
        HeapString, InternalMethods, Object, ObjectKind, Property, PropertyDescriptor,
        PropertyKey, Symbol, Value,
    },
};

/// ### \[\[ParameterMap\]\]
#[derive(Debug, Clone)]
pub(crate) struct ArgumentsMap {
    /// The environment holding the formal parameter bindings.
    pub(crate) environment: EnvironmentIndex,
    /// Parameter name mapped to each argument index. None once the mapping
    /// of an index has been removed.
    pub(crate) mapped_names: Vec<Option<HeapString>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArgumentsObject(pub(crate) Object);

impl ArgumentsObject {
    /// The parameter name mapped to `key`, if the key is a mapped index.
    fn mapped_name(
        self,
        agent: &Agent,
        key: PropertyKey,
    ) -> Option<(EnvironmentIndex, HeapString)> {
        let index = key.as_array_index()? as usize;
        match &agent.object(self.0).kind {
            ObjectKind::Arguments(Some(map)) => map
                .mapped_names
                .get(index)
                .copied()
                .flatten()
                .map(|name| (map.environment, name)),
            _ => None,
        }
    }

    fn remove_mapping(self, agent: &Agent, key: PropertyKey) {
        let Some(index) = key.as_array_index() else {
            return;
        };
        if let ObjectKind::Arguments(Some(map)) = &mut agent.object_mut(self.0).kind
            && let Some(slot) = map.mapped_names.get_mut(index as usize)
        {
            *slot = None;
        }
    }
}

impl InternalMethods for ArgumentsObject {
    fn get_backing_object(self) -> Object {
        self.0
    }

    /// ### [10.4.4.1 \[\[GetOwnProperty\]\] ( P )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        // 1. Let desc be OrdinaryGetOwnProperty(args, P).
        // 2. If desc is undefined, return undefined.
        let Some(mut desc) = ordinary_get_own_property(agent, self.0, property_key) else {
            return Ok(None);
        };
        // 3. Let map be args.[[ParameterMap]].
        // 4. Let isMapped be ! HasOwnProperty(map, P).
        // 5. If isMapped is true, then
        if let Some((environment, name)) = self.mapped_name(agent, property_key) {
            // a. Set desc.[[Value]] to ! Get(map, P).
            desc.value = Some(environment.get_binding_value(agent, name, false)?);
        }
        // 6. Return desc.
        Ok(Some(desc))
    }

    /// ### [10.4.4.2 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-defineownproperty-p-desc)
    fn internal_define_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        property_descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        // 1. Let map be args.[[ParameterMap]].
        // 2. Let isMapped be ! HasOwnProperty(map, P).
        let mapped = self.mapped_name(agent, property_key);
        // 3. Let newArgDesc be Desc.
        let mut new_arg_desc = property_descriptor;
        // 4. If isMapped is true and IsDataDescriptor(Desc) is true, then
        if let Some((environment, name)) = mapped
            && property_descriptor.is_data_descriptor()
            // a. If Desc does not have a [[Value]] field, Desc has a
            // [[Writable]] field, and Desc.[[Writable]] is false, then
            && property_descriptor.value.is_none()
            && property_descriptor.writable == Some(false)
        {
            // i. Set newArgDesc to a copy of Desc.
            // ii. Set newArgDesc.[[Value]] to ! Get(map, P).
            new_arg_desc.value = Some(environment.get_binding_value(agent, name, false)?);
        }
        // 5. Let allowed be ! OrdinaryDefineOwnProperty(args, P, newArgDesc).
        let allowed = ordinary_define_own_property(agent, self.0, property_key, new_arg_desc)?;
        // 6. If allowed is false, return false.
        if !allowed {
            return Ok(false);
        }
        // 7. If isMapped is true, then
        if let Some((environment, name)) = mapped {
            // a. If IsAccessorDescriptor(Desc) is true, then
            if property_descriptor.is_accessor_descriptor() {
                // i. Perform ! map.[[Delete]](P).
                self.remove_mapping(agent, property_key);
            } else {
                // b. Else,
                // i. If Desc has a [[Value]] field, then
                if let Some(value) = property_descriptor.value {
                    // 1. Assert: The following Set will succeed, since formal
                    // parameters mapped by arguments objects are always
                    // writable.
                    // 2. Perform ! Set(map, P, Desc.[[Value]], false).
                    environment.set_mutable_binding(agent, name, value, false)?;
                }
                // ii. If Desc has a [[Writable]] field and Desc.[[Writable]]
                // is false, then
                if property_descriptor.writable == Some(false) {
                    // 1. Perform ! map.[[Delete]](P).
                    self.remove_mapping(agent, property_key);
                }
            }
        }
        // 8. Return true.
        Ok(true)
    }

    /// ### [10.4.4.3 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-get-p-receiver)
    fn internal_get(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        // 1. Let map be args.[[ParameterMap]].
        // 2. Let isMapped be ! HasOwnProperty(map, P).
        match self.mapped_name(agent, property_key) {
            // 3. If isMapped is false, then
            // a. Return ? OrdinaryGet(args, P, Receiver).
            None => ordinary_get(agent, self.0, property_key, receiver),
            // 4. Else,
            // a. Assert: map contains a formal parameter mapping for P.
            // b. Return ! Get(map, P).
            Some((environment, name)) => environment.get_binding_value(agent, name, false),
        }
    }

    /// ### [10.4.4.4 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-set-p-v-receiver)
    fn internal_set(
        self,
        agent: &Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        // 1. If SameValue(args, Receiver) is false, then
        // a. Let isMapped be false.
        // 2. Else,
        // a. Let map be args.[[ParameterMap]].
        // b. Let isMapped be ! HasOwnProperty(map, P).
        let mapped = if receiver == Value::Object(self.0) {
            self.mapped_name(agent, property_key)
        } else {
            None
        };
        // 3. If isMapped is true, then
        if let Some((environment, name)) = mapped {
            // a. Assert: The following Set will succeed, since formal
            // parameters mapped by arguments objects are always writable.
            // b. Perform ! Set(map, P, V, false).
            environment.set_mutable_binding(agent, name, value, false)?;
        }
        // 4. Return ? OrdinarySet(args, P, V, Receiver).
        ordinary_set(agent, self.0, property_key, value, receiver)
    }

    /// ### [10.4.4.5 \[\[Delete\]\] ( P )](https://tc39.es/ecma262/#sec-arguments-exotic-objects-delete-p)
    fn internal_delete(self, agent: &Agent, property_key: PropertyKey) -> JsResult<bool> {
        // 1. Let map be args.[[ParameterMap]].
        // 2. Let isMapped be ! HasOwnProperty(map, P).
        let is_mapped = self.mapped_name(agent, property_key).is_some();
        // 3. Let result be ? OrdinaryDelete(args, P).
        let result = ordinary_delete(agent, self.0, property_key)?;
        // 4. If result is true and isMapped is true, then
        if result && is_mapped {
            // a. Perform ! map.[[Delete]](P).
            self.remove_mapping(agent, property_key);
        }
        // 5. Return result.
        Ok(result)
    }
}

/// Define the properties shared by mapped and unmapped arguments objects:
/// the indexed arguments, "length" and @@iterator.
fn define_argument_properties(agent: &Agent, obj: Object, arguments_list: &[Value]) {
    // Let len be the number of elements in argumentsList.
    // Perform ! DefinePropertyOrThrow(obj, "length", PropertyDescriptor {
    // [[Value]]: 𝔽(len), [[Writable]]: true, [[Enumerable]]: false,
    // [[Configurable]]: true }).
    let length_key = PropertyKey::from_str(agent, "length");
    obj.insert_property(
        agent,
        length_key,
        Property::data(Value::from(arguments_list.len()), true, false, true),
    );
    // Let index be 0.
    // Repeat, while index < len,
    for (index, value) in arguments_list.iter().enumerate() {
        // Let val be argumentsList[index].
        // Perform ! CreateDataPropertyOrThrow(obj, ! ToString(𝔽(index)), val).
        let key = PropertyKey::from_index(agent, index as u64);
        obj.insert_property(agent, key, Property::data(*value, true, true, true));
    }
    // Perform ! DefinePropertyOrThrow(obj, @@iterator, PropertyDescriptor {
    // [[Value]]: %Array.prototype.values%, [[Writable]]: true,
    // [[Enumerable]]: false, [[Configurable]]: true }).
    let values = agent.intrinsics().array_prototype_values();
    obj.insert_property(
        agent,
        PropertyKey::Symbol(Symbol::ITERATOR),
        Property::data(Value::Object(values), true, false, true),
    );
}

/// ### [10.4.4.6 CreateUnmappedArgumentsObject ( argumentsList )](https://tc39.es/ecma262/#sec-createunmappedargumentsobject)
pub(crate) fn create_unmapped_arguments_object(agent: &Agent, arguments_list: &[Value]) -> Object {
    // 1. Let len be the number of elements in argumentsList.
    // 2. Let obj be OrdinaryObjectCreate(%Object.prototype%, « [[ParameterMap]] »).
    // 3. Set obj.[[ParameterMap]] to undefined.
    let intrinsics = agent.intrinsics();
    let obj = Object::create(
        agent,
        Some(intrinsics.object_prototype()),
        ObjectKind::Arguments(None),
    );
    // 4-7.
    define_argument_properties(agent, obj, arguments_list);
    // 8. Perform ! DefinePropertyOrThrow(obj, "callee", PropertyDescriptor {
    // [[Get]]: %ThrowTypeError%, [[Set]]: %ThrowTypeError%, [[Enumerable]]:
    // false, [[Configurable]]: false }).
    let thrower = intrinsics.throw_type_error();
    let callee_key = PropertyKey::from_str(agent, "callee");
    obj.insert_property(
        agent,
        callee_key,
        Property::accessor(Some(thrower), Some(thrower), false, false),
    );
    // 9. Return obj.
    obj
}

/// ### [10.4.4.7 CreateMappedArgumentsObject ( func, formals, argumentsList, env )](https://tc39.es/ecma262/#sec-createmappedargumentsobject)
///
/// `parameter_names` are the bound names of the simple parameter list of
/// `func` in order, duplicates included.
pub(crate) fn create_mapped_arguments_object(
    agent: &Agent,
    func: Object,
    parameter_names: &[HeapString],
    arguments_list: &[Value],
    environment: EnvironmentIndex,
) -> Object {
    // 1. Assert: formals does not contain a rest parameter, any binding
    // patterns, or any initializers. It may contain duplicate identifiers.
    // 2. Let len be the number of elements in argumentsList.
    let len = arguments_list.len();
    // 11. Let parameterNames be the BoundNames of formals.
    // 12. Let numberOfParameters be the number of elements in
    // parameterNames.
    // 13. Let mappedNames be a new empty List.
    // 14. Let index be numberOfParameters - 1.
    // 15. Repeat, while index ≥ 0,
    let mut mapped_names: Vec<Option<HeapString>> = vec![None; len.min(parameter_names.len())];
    for (index, name) in parameter_names.iter().enumerate().rev() {
        // a. Let name be parameterNames[index].
        // b. If mappedNames does not contain name, then
        let already_mapped = parameter_names[index + 1..].contains(name);
        // ii. If index < len, then
        if !already_mapped && index < len {
            // 1. Let g be MakeArgGetter(name, env).
            // 2. Let p be MakeArgSetter(name, env).
            // 3. Perform ! map.[[DefineOwnProperty]](! ToString(𝔽(index)),
            // PropertyDescriptor { [[Set]]: p, [[Get]]: g, [[Enumerable]]:
            // false, [[Configurable]]: true }).
            mapped_names[index] = Some(*name);
        }
        // c. Set index to index - 1.
    }
    // 3. Let obj be MakeBasicObject(« [[Prototype]], [[Extensible]],
    // [[ParameterMap]] »).
    // 4. Set obj.[[GetOwnProperty]] as specified in 10.4.4.1.
    // 5. Set obj.[[DefineOwnProperty]] as specified in 10.4.4.2.
    // 6. Set obj.[[Get]] as specified in 10.4.4.3.
    // 7. Set obj.[[Set]] as specified in 10.4.4.4.
    // 8. Set obj.[[Delete]] as specified in 10.4.4.5.
    // 9. Set obj.[[Prototype]] to %Object.prototype%.
    // 10. Let map be OrdinaryObjectCreate(null).
    // 16. Set obj.[[ParameterMap]] to map.
    let obj = Object::create(
        agent,
        Some(agent.intrinsics().object_prototype()),
        ObjectKind::Arguments(Some(Box::new(ArgumentsMap {
            environment,
            mapped_names,
        }))),
    );
    // 17-21.
    define_argument_properties(agent, obj, arguments_list);
    // 22. Perform ! DefinePropertyOrThrow(obj, "callee", PropertyDescriptor {
    // [[Value]]: func, [[Writable]]: true, [[Enumerable]]: false,
    // [[Configurable]]: true }).
    let callee_key = PropertyKey::from_str(agent, "callee");
    obj.insert_property(
        agent,
        callee_key,
        Property::data(Value::Object(func), true, false, true),
    );
    // 23. Return obj.
    obj
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::{get, set},
        execution::{DefaultHostHooks, agent::Options, new_declarative_environment},
    };

    #[test]
    fn mapped_arguments_alias_parameters() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        agent.create_realm();
        let env = new_declarative_environment(&agent, None);
        let a = HeapString::from_str(&agent, "a");
        env.create_mutable_binding(&agent, a, false);
        env.initialize_binding(&agent, a, Value::Number(1.0));
        let func = Object::create(&agent, None, ObjectKind::Ordinary);
        let arguments = create_mapped_arguments_object(
            &agent,
            func,
            &[a],
            &[Value::Number(1.0), Value::Number(2.0)],
            EnvironmentIndex::Declarative(env),
        );
        set(&agent, arguments, PropertyKey::Integer(0), Value::Number(5.0), true).unwrap();
        assert_eq!(env.get_binding_value(&agent, a, true), Ok(Value::Number(5.0)));
        env.set_mutable_binding(&agent, a, Value::Number(7.0), true).unwrap();
        assert_eq!(
            get(&agent, arguments, PropertyKey::Integer(0)),
            Ok(Value::Number(7.0))
        );
        // Unmapped indices behave as plain data properties.
        assert_eq!(
            get(&agent, arguments, PropertyKey::Integer(1)),
            Ok(Value::Number(2.0))
        );
        // Deleting an index removes the mapping.
        assert!(arguments.internal_delete(&agent, PropertyKey::Integer(0)).unwrap());
        env.set_mutable_binding(&agent, a, Value::Number(9.0), true).unwrap();
        assert_eq!(
            get(&agent, arguments, PropertyKey::Integer(0)),
            Ok(Value::Undefined)
        );
    }
}
