// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [15.7.14 Runtime Semantics: ClassDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-classdefinitionevaluation)

use std::rc::Rc;

use specter_ast::ast::{ClassElement, ClassElementName, ClassNode, FunctionNode};

use super::{
    evaluate_expression,
    expressions::evaluate_property_name,
    function_definitions::{define_method, method_definition_evaluation},
    lexical_environment, name_string, private_environment,
};
use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{call_function, get, private_method_or_accessor_add},
        testing_and_comparison::is_constructor,
    },
    builtins::{
        ecmascript_function::{
            ClassElementKey, ClassFieldDefinition, ConstructorKind, define_field,
            define_method_property, default_class_constructor_create, make_class_constructor,
            make_constructor, set_class_elements, set_class_field_initializer_name,
            set_function_name,
        },
        ordinary::ordinary_object_create,
    },
    execution::{
        Agent, EnvironmentIndex, PrivateEnvironment, agent::ExceptionType,
        new_declarative_environment, new_private_environment,
    },
    types::{
        Completion, HeapString, Object, PrivateElement, PrivateElementKind, PropertyKey, Value,
    },
};

/// Static fields and static blocks run in source order once the class
/// binding is initialized.
enum StaticElement {
    Field(ClassFieldDefinition),
    Block(Object),
}

/// Evaluate a class definition. `class_binding` is the inner binding name of
/// a named class; `class_name` becomes the constructor's "name".
pub(crate) async fn class_definition_evaluation(
    agent: &Agent,
    node: &Rc<ClassNode>,
    class_binding: Option<HeapString>,
    class_name: ClassElementKey,
) -> Completion<Object> {
    // 1. Let env be the LexicalEnvironment of the running execution context.
    let env = lexical_environment(agent)?;
    // 4. Let outerPrivateEnvironment be the running execution context's
    // PrivateEnvironment.
    let outer_private_environment = private_environment(agent);
    let result = class_definition_evaluation_inner(
        agent,
        node,
        class_binding,
        class_name,
        env,
        outer_private_environment,
    )
    .await;
    // Every exit leaves the running execution context with the environments
    // it had on entry.
    agent.set_lexical_environment(env);
    agent.set_private_environment(outer_private_environment);
    result
}

async fn class_definition_evaluation_inner(
    agent: &Agent,
    node: &Rc<ClassNode>,
    class_binding: Option<HeapString>,
    class_name: ClassElementKey,
    env: EnvironmentIndex,
    outer_private_environment: Option<PrivateEnvironment>,
) -> Completion<Object> {
    // 2. Let classEnv be NewDeclarativeEnvironment(env).
    let class_env = new_declarative_environment(agent, Some(env));
    // 3. If classBinding is not undefined, then
    if let Some(class_binding) = class_binding {
        // a. Perform ! classEnv.CreateImmutableBinding(classBinding, true).
        class_env.create_immutable_binding(agent, class_binding, true);
    }
    // 5. Let classPrivateEnvironment be NewPrivateEnvironment(outerPrivateEnvironment).
    let class_private_environment = new_private_environment(agent, outer_private_environment);
    // 6. If ClassBody is present, then
    // a. For each String dn of the PrivateBoundIdentifiers of ClassBody, do
    for element in &node.elements {
        let name = match element {
            ClassElement::Method {
                key: ClassElementName::Private(name),
                ..
            }
            | ClassElement::Field {
                key: ClassElementName::Private(name),
                ..
            } => name,
            _ => continue,
        };
        // i. If classPrivateEnvironment.[[Names]] contains a Private Name pn
        // such that pn.[[Description]] is dn, then
        // 1. Assert: This is only possible for getter/setter pairs.
        // ii. Else,
        // 1. Let name be a new Private Name whose [[Description]] is dn.
        // 2. Append name to classPrivateEnvironment.[[Names]].
        let identifier = HeapString::from_str(agent, &format!("#{name}"));
        class_private_environment.add_private_name(agent, identifier);
    }
    let (proto_parent, constructor_parent) = match &node.heritage {
        // 7. If ClassHeritage is not present, then
        None => {
            // a. Let protoParent be %Object.prototype%.
            // b. Let constructorParent be %Function.prototype%.
            let intrinsics = agent.intrinsics();
            (
                Some(intrinsics.object_prototype()),
                intrinsics.function_prototype(),
            )
        }
        // 8. Else,
        Some(heritage) => {
            // a. Set the running execution context's LexicalEnvironment to classEnv.
            // b. NOTE: The running execution context's PrivateEnvironment is
            // outerPrivateEnvironment when evaluating ClassHeritage.
            agent.set_lexical_environment(EnvironmentIndex::Declarative(class_env));
            // c. Let superclassRef be Completion(Evaluation of ClassHeritage).
            // e. Let superclass be ? GetValue(? superclassRef).
            let superclass = evaluate_expression(agent, heritage).await;
            // d. Set the running execution context's LexicalEnvironment to env.
            agent.set_lexical_environment(env);
            match superclass? {
                // f. If superclass is null, then
                Value::Null => {
                    // i. Let protoParent be null.
                    // ii. Let constructorParent be %Function.prototype%.
                    (None, agent.intrinsics().function_prototype())
                }
                // g. Else if IsConstructor(superclass) is false, then
                superclass if !is_constructor(agent, superclass) => {
                    // i. Throw a TypeError exception.
                    let message = format!(
                        "Class extends value {} is not a constructor or null",
                        superclass.to_display_string(agent)
                    );
                    return Err(agent
                        .throw_exception(ExceptionType::TypeError, message)
                        .into());
                }
                // h. Else,
                superclass => {
                    let Some(superclass) = superclass.as_object() else {
                        return Err(agent.internal_error("constructor is not an object").into());
                    };
                    // i. Let protoParent be ? Get(superclass, "prototype").
                    let prototype_key = PropertyKey::from_str(agent, "prototype");
                    let proto_parent = get(agent, superclass, prototype_key)?;
                    // ii. If protoParent is not an Object and protoParent is
                    // not null, throw a TypeError exception.
                    let proto_parent = match proto_parent {
                        Value::Null => None,
                        Value::Object(object) => Some(object),
                        _ => {
                            return Err(agent
                                .throw_exception_with_static_message(
                                    ExceptionType::TypeError,
                                    "Class extends value does not have valid prototype property",
                                )
                                .into());
                        }
                    };
                    // iii. Let constructorParent be superclass.
                    (proto_parent, superclass)
                }
            }
        }
    };
    // 9. Let proto be OrdinaryObjectCreate(protoParent).
    let proto = ordinary_object_create(agent, proto_parent);
    // 11. Set the running execution context's LexicalEnvironment to classEnv.
    agent.set_lexical_environment(EnvironmentIndex::Declarative(class_env));
    // 12. Set the running execution context's PrivateEnvironment to
    // classPrivateEnvironment.
    agent.set_private_environment(Some(class_private_environment));
    // 10. Let constructor be the ConstructorMethod of ClassBody.
    let f = match &node.constructor {
        // 14. Else,
        Some(constructor) => {
            // a. Let constructorInfo be ! DefineMethod of constructor with
            // arguments proto and constructorParent.
            // b. Let F be constructorInfo.[[Closure]].
            define_method(agent, proto, constructor, Some(constructor_parent))?
        }
        // 13. If constructor is EMPTY, then
        None => {
            // a. Let defaultConstructor be a new Abstract Closure with no
            // parameters that captures nothing.
            // b. Let F be CreateBuiltinFunction(defaultConstructor, 0,
            // className, « [[ConstructorKind]], [[SourceText]] », the current
            // Realm Record, constructorParent).
            default_class_constructor_create(
                agent,
                constructor_parent,
                EnvironmentIndex::Declarative(class_env),
                Some(class_private_environment),
            )
        }
    };
    // c. Perform MakeClassConstructor(F).
    // d. Perform SetFunctionName(F, className).
    set_function_name(agent, f, class_name, None);
    // 16. Perform MakeConstructor(F, false, proto).
    make_constructor(agent, f, false, Some(proto));
    // 15. If ClassHeritage is present, set F.[[ConstructorKind]] to DERIVED.
    let kind = if node.heritage.is_some() {
        ConstructorKind::Derived
    } else {
        ConstructorKind::Base
    };
    make_class_constructor(agent, f, node.clone(), kind);
    // 17. Perform CreateMethodProperty(proto, "constructor", F).
    let constructor_key = PropertyKey::from_str(agent, "constructor");
    define_method_property(agent, proto, constructor_key, f, false)?;
    // 19. Let instancePrivateMethods be a new empty List.
    let mut instance_private_methods = Vec::new();
    // 20. Let staticPrivateMethods be a new empty List.
    let mut static_private_methods = Vec::new();
    // 21. Let instanceFields be a new empty List.
    let mut instance_fields = Vec::new();
    // 22. Let staticElements be a new empty List.
    let mut static_elements = Vec::new();
    // 23. For each ClassElement e of elements, do
    for element in &node.elements {
        match element {
            ClassElement::Method {
                key,
                is_static,
                kind,
                function,
            } => {
                // a. If IsStatic of e is false, then
                // i. Let element be Completion(ClassElementEvaluation of e
                // with argument proto).
                // b. Else,
                // i. Let element be Completion(ClassElementEvaluation of e
                // with argument F).
                let home = if *is_static { f } else { proto };
                let key = class_element_name(agent, key).await?;
                let element =
                    method_definition_evaluation(agent, home, key, *kind, function, false)?;
                // e. If element is a PrivateElement, then
                if let Some(element) = element {
                    let container = if *is_static {
                        &mut static_private_methods
                    } else {
                        &mut instance_private_methods
                    };
                    add_private_method(container, element);
                }
            }
            ClassElement::Field {
                key,
                is_static,
                initializer,
            } => {
                let home = if *is_static { f } else { proto };
                let field = class_field_definition_evaluation(agent, key, initializer, home).await?;
                // f. Else if element is a ClassFieldDefinition Record, then
                // i. If IsStatic of e is false, append element to instanceFields.
                // ii. Else, append element to staticElements.
                if *is_static {
                    static_elements.push(StaticElement::Field(field));
                } else {
                    instance_fields.push(field);
                }
            }
            ClassElement::StaticBlock(body) => {
                // g. Else if element is a ClassStaticBlockDefinition Record,
                // then
                // i. Append element to staticElements.
                let body_function = class_static_block_definition_evaluation(agent, body, f)?;
                static_elements.push(StaticElement::Block(body_function));
            }
        }
    }
    // 24. Set the running execution context's LexicalEnvironment to env.
    agent.set_lexical_environment(env);
    // 25. If classBinding is not undefined, then
    if let Some(class_binding) = class_binding {
        // a. Perform ! classEnv.InitializeBinding(classBinding, F).
        class_env.initialize_binding(agent, class_binding, Value::Object(f));
    }
    // 26. Set F.[[PrivateMethods]] to instancePrivateMethods.
    // 27. Set F.[[Fields]] to instanceFields.
    set_class_elements(agent, f, instance_fields, instance_private_methods);
    // 28. For each PrivateElement method of staticPrivateMethods, do
    for method in static_private_methods {
        // a. Perform ! PrivateMethodOrAccessorAdd(F, method).
        private_method_or_accessor_add(agent, f, method)?;
    }
    // 29. For each element elementRecord of staticElements, do
    for element in static_elements {
        match element {
            // a. If elementRecord is a ClassFieldDefinition Record, then
            // i. Let result be Completion(DefineField(F, elementRecord)).
            StaticElement::Field(field) => define_field(agent, f, field)?,
            // b. Else,
            // ii. Let result be Completion(Call(elementRecord.[[BodyFunction]], F)).
            StaticElement::Block(body_function) => {
                call_function(agent, body_function, Value::Object(f), &[])?;
            }
        }
    }
    // 30. Set the running execution context's PrivateEnvironment to
    // outerPrivateEnvironment.
    // 31. Return F.
    Ok(f)
}

/// ### [15.7.3 Runtime Semantics: Evaluation of ClassElementName](https://tc39.es/ecma262/#sec-class-definitions-runtime-semantics-evaluation)
async fn class_element_name(agent: &Agent, name: &ClassElementName) -> Completion<ClassElementKey> {
    match name {
        ClassElementName::Property(name) => Ok(ClassElementKey::Property(
            evaluate_property_name(agent, name).await?,
        )),
        ClassElementName::Private(name) => {
            // 1. Let privateIdentifier be the StringValue of PrivateIdentifier.
            // 2. Let privateEnvRec be the running execution context's
            // PrivateEnvironment.
            let Some(private_env) = private_environment(agent) else {
                return Err(agent.internal_error("class element outside a class scope").into());
            };
            // 3. Let names be privateEnvRec.[[Names]].
            // 4. Assert: Exactly one element of names is a Private Name whose
            // [[Description]] is privateIdentifier.
            // 5. Let privateName be the Private Name in names whose
            // [[Description]] is privateIdentifier.
            // 6. Return privateName.
            let identifier = name_string(agent, &format!("#{name}"));
            Ok(ClassElementKey::Private(
                private_env.add_private_name(agent, identifier),
            ))
        }
    }
}

/// Getter and setter of the same private name combine into one accessor.
fn add_private_method(container: &mut Vec<PrivateElement>, element: PrivateElement) {
    // i. If container contains a PrivateElement pe such that pe.[[Key]] is
    // element.[[Key]], then
    let existing = container
        .iter_mut()
        .find(|existing| existing.key == element.key);
    match (existing, element.kind) {
        (
            Some(existing),
            PrivateElementKind::Accessor { get, set },
        ) => {
            // 1. Assert: element.[[Kind]] and pe.[[Kind]] are both ACCESSOR.
            // 2. If element.[[Get]] is undefined, then
            // a. Let combined be PrivateElement { [[Key]]: element.[[Key]],
            // [[Kind]]: ACCESSOR, [[Get]]: pe.[[Get]], [[Set]]: element.[[Set]] }.
            // 3. Else,
            // a. Let combined be PrivateElement { [[Key]]: element.[[Key]],
            // [[Kind]]: ACCESSOR, [[Get]]: element.[[Get]], [[Set]]: pe.[[Set]] }.
            // 4. Replace pe in container with combined.
            if let PrivateElementKind::Accessor {
                get: existing_get,
                set: existing_set,
            } = &mut existing.kind
            {
                if get.is_some() {
                    *existing_get = get;
                }
                if set.is_some() {
                    *existing_set = set;
                }
            }
        }
        // ii. Else,
        // 1. Append element to container.
        _ => container.push(element),
    }
}

/// ### [15.7.10 Runtime Semantics: ClassFieldDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-classfielddefinitionevaluation)
async fn class_field_definition_evaluation(
    agent: &Agent,
    key: &ClassElementName,
    initializer: &Option<Rc<FunctionNode>>,
    home_object: Object,
) -> Completion<ClassFieldDefinition> {
    // 1. Let name be ? Evaluation of ClassElementName.
    let name = class_element_name(agent, key).await?;
    // 2. If Initializer is present, then
    let initializer = match initializer {
        Some(node) => {
            // a. Let formalParameterList be an instance of the production
            // FormalParameters : [empty] .
            // b. Let env be the LexicalEnvironment of the running execution
            // context.
            // c. Let privateEnv be the running execution context's
            // PrivateEnvironment.
            // d. Let sourceText be the empty sequence of Unicode code points.
            // e. Let initializer be OrdinaryFunctionCreate(%Function.prototype%,
            // sourceText, formalParameterList, Initializer, NON-LEXICAL-THIS,
            // env, privateEnv).
            // f. Perform MakeMethod(initializer, homeObject).
            let initializer = define_method(agent, home_object, node, None)?;
            // g. Set initializer.[[ClassFieldInitializerName]] to name.
            set_class_field_initializer_name(agent, initializer, name);
            Some(initializer)
        }
        // 3. Else,
        // a. Let initializer be EMPTY.
        None => None,
    };
    // 4. Return the ClassFieldDefinition Record { [[Name]]: name,
    // [[Initializer]]: initializer }.
    Ok(ClassFieldDefinition { name, initializer })
}

/// ### [15.7.11 Runtime Semantics: ClassStaticBlockDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-classstaticblockdefinitionevaluation)
fn class_static_block_definition_evaluation(
    agent: &Agent,
    body: &Rc<FunctionNode>,
    home_object: Object,
) -> Completion<Object> {
    // 1. Let lex be the running execution context's LexicalEnvironment.
    // 2. Let privateEnv be the running execution context's PrivateEnvironment.
    // 3. Let sourceText be the empty sequence of Unicode code points.
    // 4. Let formalParameters be an instance of the production
    // FormalParameters : [empty] .
    // 5. Let bodyFunction be OrdinaryFunctionCreate(%Function.prototype%,
    // sourceText, formalParameters, ClassStaticBlockBody, NON-LEXICAL-THIS,
    // lex, privateEnv).
    // 6. Perform MakeMethod(bodyFunction, homeObject).
    // 7. Return the ClassStaticBlockDefinition Record { [[BodyFunction]]:
    // bodyFunction }.
    Ok(define_method(agent, home_object, body, None)?)
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn constructors_fields_and_methods() {
        assert_eq!(
            run_to_string(
                "class Point {
                     z = this.x + this.y;
                     constructor(x, y) { this.x = x; this.y = y; }
                     sum() { return this.x + this.y; }
                 }
                 let p = new Point(1, 2);
                 [p.sum(), p.z, Point.name, Point.length, typeof Point].join()"
            ),
            "3,NaN,Point,2,function"
        );
    }

    #[test]
    fn field_initializers_run_before_the_constructor_body() {
        assert_eq!(
            run_to_string(
                "class A { x = 1; constructor() { this.y = this.x + 1; } }
                 let a = new A(); a.x + a.y"
            ),
            "3"
        );
    }

    #[test]
    fn derived_classes_call_super() {
        assert_eq!(
            run_to_string(
                "class A { constructor(v) { this.v = v; } get double() { return this.v * 2; } }
                 class B extends A { triple() { return this.v * 3; } }
                 let b = new B(5);
                 [b.double, b.triple(), b instanceof A, Object.getPrototypeOf(B) === A].join()"
            ),
            "10,15,true,true"
        );
    }

    #[test]
    fn private_members_are_scoped_to_the_class_body() {
        assert_eq!(
            run_to_string(
                "class Counter {
                     #count = 0;
                     static #instances = 0;
                     #bump() { return ++this.#count; }
                     get #value() { return this.#count; }
                     set #value(v) { this.#count = v; }
                     constructor() { Counter.#instances++; }
                     tick() { this.#bump(); this.#value = this.#value * 10; return this.#count; }
                     static count() { return Counter.#instances; }
                     static has(o) { return #count in o; }
                 }
                 let c = new Counter(); new Counter();
                 [c.tick(), Counter.count(), Counter.has(c), Counter.has({})].join()"
            ),
            "10,2,true,false"
        );
    }

    #[test]
    fn static_blocks_and_fields_run_in_order() {
        assert_eq!(
            run_to_string(
                "let log = [];
                 class C {
                     static a = log.push('a');
                     static { log.push('block:' + this.name); }
                     static b = log.push('b');
                 }
                 log.join()"
            ),
            "a,block:C,b"
        );
    }

    #[test]
    fn invalid_heritage_throws_type_error() {
        assert_eq!(
            run_to_string("try { class X extends 3 {} } catch (e) { e instanceof TypeError }"),
            "true"
        );
        assert_eq!(
            run_to_string(
                "function F() {} F.prototype = 3;
                 try { class X extends F {} } catch (e) { e.constructor.name }"
            ),
            "TypeError"
        );
    }

    #[test]
    fn null_heritage_has_no_prototype_parent() {
        assert_eq!(
            run_to_string("class N extends null {} Object.getPrototypeOf(N.prototype) === null"),
            "true"
        );
    }

    #[test]
    fn class_binding_is_immutable_inside_the_body() {
        assert_eq!(
            run_to_string(
                "class K { static f() { try { K = 1; } catch (e) { return e.name; } } }
                 K.f()"
            ),
            "TypeError"
        );
    }

    #[test]
    fn class_constructors_require_new() {
        assert_eq!(
            run_to_string("class Q {} try { Q(); } catch (e) { e instanceof TypeError }"),
            "true"
        );
    }
}
