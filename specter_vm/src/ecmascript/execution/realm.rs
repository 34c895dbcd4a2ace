// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod intrinsics;

use std::{any::Any, rc::Rc};

use ahash::AHashMap;
use specter_ast::ast::{Module, Script, TemplateLiteral};

pub(crate) use intrinsics::{IntrinsicObjectIndex, Intrinsics, ProtoIntrinsics};

use super::{Agent, ExecutionContext, GlobalEnvironment, agent::EvaluationError};
use crate::ecmascript::{
    abstract_operations::operations_on_objects::define_property_or_throw,
    builtins::ordinary::ordinary_object_create,
    execution::JsResult,
    scripts_and_modules::{
        module::{ModuleIdentifier, evaluate_root_module, module_evaluation_result},
        script::{ScriptRecord, script_evaluation},
    },
    types::{Object, PropertyDescriptor, PropertyKey, Value},
};

/// ### [9.3 Realms](https://tc39.es/ecma262/#sec-code-realms)
///
/// Before it is evaluated, all ECMAScript code must be associated with a
/// realm. Conceptually, a realm consists of a set of intrinsic objects, an
/// ECMAScript global environment, all of the ECMAScript code that is loaded
/// within the scope of that global environment, and other associated state
/// and resources.
#[derive(Debug)]
pub(crate) struct RealmRecord {
    /// ### \[\[Intrinsics\]\]
    ///
    /// The intrinsic values used by code associated with this realm.
    pub(crate) intrinsics: Intrinsics,

    /// ### \[\[GlobalObject\]\]
    ///
    /// The global object for this realm.
    pub(crate) global_object: Object,

    /// ### \[\[GlobalEnv\]\]
    ///
    /// The global environment for this realm.
    pub(crate) global_env: GlobalEnvironment,

    /// ### \[\[TemplateMap\]\]
    ///
    /// Template objects are canonicalized separately for each realm using
    /// its Realm Record's \[\[TemplateMap\]\]. Each \[\[Site\]\] value is a
    /// Parse Node that is a TemplateLiteral; nodes are compared by identity.
    pub(crate) template_map: Vec<(Rc<TemplateLiteral>, Object)>,

    /// ### \[\[LoadedModules\]\]
    ///
    /// Modules imported by code of this realm, keyed by the host defined
    /// key returned from the module loading hook.
    pub(crate) loaded_modules: AHashMap<Rc<str>, ModuleIdentifier>,

    /// ### \[\[HostDefined\]\]
    ///
    /// Field reserved for use by hosts that need to associate additional
    /// information with a Realm Record.
    pub(crate) host_defined: Option<Rc<dyn Any>>,
}

/// Handle to a realm of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Realm(pub(crate) u32);

impl Realm {
    /// ### [9.3.1 InitializeHostDefinedRealm ( )](https://tc39.es/ecma262/#sec-initializehostdefinedrealm)
    pub(crate) fn create(agent: &Agent) -> Realm {
        // 1. Let realmRec be a new Realm Record.
        // 2. Perform CreateIntrinsics(realmRec).
        let intrinsics = Intrinsics::create(agent);
        // 3. Set realmRec.[[AgentSignifier]] to AgentSignifier().
        // 4. Set realmRec.[[TemplateMap]] to a new empty List.
        // 5. Let newContext be a new execution context.
        // 6. Set the Function of newContext to null.
        // 7. Set the Realm of newContext to realm.
        // 8. Set the ScriptOrModule of newContext to null.
        // 9. Push newContext onto the execution context stack; newContext is
        // now the running execution context.
        // 10. If the host requires use of an exotic object to serve as
        // realm's global object, then
        //     a. Let global be such an object created in a host-defined
        //     manner.
        // 11. Else,
        //     a. Let global be undefined, indicating that an ordinary object
        //     should be created as the global object.
        // 12. If the host requires that the this binding in realm's global
        // scope return an object other than the global object, then
        //     a. Let thisValue be such an object created in a host-defined
        //     manner.
        // 13. Else,
        //     a. Let thisValue be undefined, indicating that realm's global
        //     this binding should be the global object.
        // 14. Perform SetRealmGlobalObject(realm, global, thisValue).
        let (global_object, global_env) = set_realm_global_object(agent, &intrinsics);
        let realm = {
            let mut heap = agent.heap_mut();
            let realm = Realm(u32::try_from(heap.realms.len()).unwrap_or(u32::MAX));
            heap.realms.push(RealmRecord {
                intrinsics,
                global_object,
                global_env,
                template_map: Vec::new(),
                loaded_modules: AHashMap::default(),
                host_defined: None,
            });
            realm
        };
        agent.push_execution_context(ExecutionContext {
            ecmascript_code: None,
            function: None,
            realm,
            script_or_module: None,
            coroutine: None,
        });
        Intrinsics::populate(agent, realm);
        // 15. Let globalObj be ? SetDefaultGlobalBindings(realm).
        let result = set_default_global_bindings(agent, realm);
        // 16. Create any host-defined global object properties on globalObj.
        agent.pop_execution_context();
        if let Err(error) = result {
            tracing::error!(event = "create_realm_failed", ?error);
        }
        tracing::debug!(event = "create_realm", realm = realm.0);
        // 17. Return UNUSED.
        realm
    }

    pub(crate) fn intrinsics(self, agent: &Agent) -> Intrinsics {
        agent.realm_record(self).intrinsics
    }

    /// The global object of the realm.
    pub fn global_object(self, agent: &Agent) -> Object {
        agent.realm_record(self).global_object
    }

    pub(crate) fn global_env(self, agent: &Agent) -> GlobalEnvironment {
        agent.realm_record(self).global_env
    }

    /// Attach host data to the realm.
    pub fn set_host_defined(self, agent: &Agent, host_defined: Option<Rc<dyn Any>>) {
        agent.realm_record_mut(self).host_defined = host_defined;
    }

    pub fn host_defined(self, agent: &Agent) -> Option<Rc<dyn Any>> {
        agent.realm_record(self).host_defined.clone()
    }

    /// Evaluate a parsed Script in this realm, then run every job the
    /// evaluation enqueued.
    ///
    /// Returns the completion value of the script, with an empty completion
    /// reported as undefined.
    pub fn evaluate_script(self, agent: &Agent, script: Script) -> Result<Value, EvaluationError> {
        let _span = tracing::debug_span!("evaluate_script", realm = self.0).entered();
        if agent.options().print_internals {
            agent.host_hooks().print(&format!("{:#?}", script.body));
        }
        let script = ScriptRecord::create(agent, self, script);
        let result = script_evaluation(agent, script);
        agent.run_jobs()?;
        Ok(result?.unwrap_or(Value::Undefined))
    }

    /// Load, link and evaluate a parsed Module as the root of a module graph
    /// in this realm, then run every job the evaluation enqueued.
    ///
    /// Returns undefined, or the rejection reason of the module's
    /// evaluation as [`EvaluationError::Thrown`].
    pub fn evaluate_module(
        self,
        agent: &Agent,
        module: Module,
        host_defined: Option<Rc<str>>,
    ) -> Result<Value, EvaluationError> {
        let _span = tracing::debug_span!("evaluate_module", realm = self.0).entered();
        if agent.options().print_internals {
            agent.host_hooks().print(&format!("{:#?}", module.body));
        }
        let promise = evaluate_root_module(agent, self, module, host_defined);
        agent.run_jobs()?;
        module_evaluation_result(agent, promise?)
    }
}

/// ### [9.3.3 SetRealmGlobalObject ( realmRec, globalObj, thisValue )](https://tc39.es/ecma262/#sec-setrealmglobalobject)
fn set_realm_global_object(agent: &Agent, intrinsics: &Intrinsics) -> (Object, GlobalEnvironment) {
    // 1. If globalObj is undefined, then
    //     a. Let intrinsics be realmRec.[[Intrinsics]].
    //     b. Set globalObj to OrdinaryObjectCreate(intrinsics.[[%Object.prototype%]]).
    let global_object = ordinary_object_create(agent, Some(intrinsics.object_prototype()));
    // 2. Assert: globalObj is an Object.
    // 3. If thisValue is undefined, set thisValue to globalObj.
    // 4. Set realmRec.[[GlobalObject]] to globalObj.
    // 5. Let newGlobalEnv be NewGlobalEnvironment(globalObj, thisValue).
    // 6. Set realmRec.[[GlobalEnv]] to newGlobalEnv.
    let global_env = GlobalEnvironment::new(agent, global_object, global_object);
    // 7. Return UNUSED.
    (global_object, global_env)
}

/// ### [9.3.4 SetDefaultGlobalBindings ( realmRec )](https://tc39.es/ecma262/#sec-setdefaultglobalbindings)
fn set_default_global_bindings(agent: &Agent, realm: Realm) -> JsResult<Object> {
    // 1. Let global be realmRec.[[GlobalObject]].
    let global = realm.global_object(agent);
    let intrinsics = realm.intrinsics(agent);

    // 2. For each property of the Global Object specified in clause 19, do
    macro_rules! define_property {
        (intrinsic $name:literal, $value:ident) => {
            let value = Value::Object(intrinsics.$value());
            define_property!($name, value, true, false, true);
        };
        ($name:literal, $value:expr, $writable:expr, $enumerable:expr, $configurable:expr) => {
            // a. Let name be the String value of the property name.
            let name = PropertyKey::from_str(agent, $name);
            // b. Let desc be the fully populated data Property Descriptor for
            // the property, containing the specified attributes for the
            // property. For properties listed in 19.2, 19.3, or 19.4 the
            // value of the [[Value]] attribute is the corresponding intrinsic
            // object from realmRec.
            let desc = PropertyDescriptor {
                value: Some($value),
                writable: Some($writable),
                enumerable: Some($enumerable),
                configurable: Some($configurable),
                ..Default::default()
            };
            // c. Perform ? DefinePropertyOrThrow(global, name, desc).
            define_property_or_throw(agent, global, name, desc)?;
        };
    }

    // 19.1 Value Properties of the Global Object
    {
        // 19.1.1 globalThis
        let this_value = realm.global_env(agent).get_this_binding(agent);
        define_property!("globalThis", Value::Object(this_value), true, false, true);
        // 19.1.2 Infinity
        define_property!("Infinity", Value::Number(f64::INFINITY), false, false, false);
        // 19.1.3 NaN
        define_property!("NaN", Value::Number(f64::NAN), false, false, false);
        // 19.1.4 undefined
        define_property!("undefined", Value::Undefined, false, false, false);
    }

    // 19.2 Function Properties of the Global Object
    {
        // 19.2.1 eval ( x )
        define_property!(intrinsic "eval", eval);
        // 19.2.2 isFinite ( number )
        define_property!(intrinsic "isFinite", is_finite);
        // 19.2.3 isNaN ( number )
        define_property!(intrinsic "isNaN", is_nan);
        // 19.2.4 parseFloat ( string )
        define_property!(intrinsic "parseFloat", parse_float);
        // 19.2.5 parseInt ( string, radix )
        define_property!(intrinsic "parseInt", parse_int);
        define_property!(intrinsic "print", print);
    }

    // 19.3 Constructor Properties of the Global Object
    {
        define_property!(intrinsic "AggregateError", aggregate_error);
        define_property!(intrinsic "Array", array);
        define_property!(intrinsic "ArrayBuffer", array_buffer);
        define_property!(intrinsic "BigInt", bigint);
        define_property!(intrinsic "Boolean", boolean);
        define_property!(intrinsic "Error", error);
        define_property!(intrinsic "EvalError", eval_error);
        define_property!(intrinsic "Float32Array", float32_array);
        define_property!(intrinsic "Float64Array", float64_array);
        define_property!(intrinsic "Function", function);
        define_property!(intrinsic "Int8Array", int8_array);
        define_property!(intrinsic "Int16Array", int16_array);
        define_property!(intrinsic "Int32Array", int32_array);
        define_property!(intrinsic "Map", map);
        define_property!(intrinsic "Number", number);
        define_property!(intrinsic "Object", object);
        define_property!(intrinsic "Promise", promise);
        define_property!(intrinsic "Proxy", proxy);
        define_property!(intrinsic "RangeError", range_error);
        define_property!(intrinsic "ReferenceError", reference_error);
        #[cfg(feature = "regexp")]
        {
            define_property!(intrinsic "RegExp", regexp);
        }
        define_property!(intrinsic "Set", set);
        define_property!(intrinsic "String", string);
        define_property!(intrinsic "Symbol", symbol);
        define_property!(intrinsic "SyntaxError", syntax_error);
        define_property!(intrinsic "TypeError", type_error);
        define_property!(intrinsic "Uint8Array", uint8_array);
        define_property!(intrinsic "Uint8ClampedArray", uint8_clamped_array);
        define_property!(intrinsic "Uint16Array", uint16_array);
        define_property!(intrinsic "Uint32Array", uint32_array);
        define_property!(intrinsic "URIError", uri_error);
    }

    // 19.4 Other Properties of the Global Object
    {
        #[cfg(feature = "json")]
        {
            define_property!(intrinsic "JSON", json);
        }
        define_property!(intrinsic "Math", math);
        define_property!(intrinsic "Reflect", reflect);
        define_property!(intrinsic "console", console);
    }

    // 3. Return UNUSED.
    Ok(global)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::get,
        execution::{DefaultHostHooks, agent::Options},
    };

    #[test]
    fn realms_have_distinct_intrinsics() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        let first = agent.create_realm();
        let second = agent.create_realm();
        assert_ne!(first, second);
        assert_ne!(
            first.intrinsics(&agent).object_prototype(),
            second.intrinsics(&agent).object_prototype()
        );
        assert_eq!(agent.execution_context_depth(), 0);
    }

    #[test]
    fn global_object_has_default_bindings() {
        let agent = Agent::new(Options::default(), Rc::new(DefaultHostHooks));
        let realm = agent.create_realm();
        let global = realm.global_object(&agent);
        let key = PropertyKey::from_str(&agent, "globalThis");
        assert_eq!(get(&agent, global, key), Ok(Value::Object(global)));
        let key = PropertyKey::from_str(&agent, "Array");
        assert_eq!(
            get(&agent, global, key),
            Ok(Value::Object(realm.intrinsics(&agent).array()))
        );
    }
}
