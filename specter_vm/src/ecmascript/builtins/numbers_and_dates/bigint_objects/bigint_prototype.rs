// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::type_conversion::to_integer_or_infinity,
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{ArgumentsList, Behaviour, Builtin, primitive_objects::primitive_value},
    execution::{Agent, JsResult, Realm, agent::ExceptionType},
    types::{HeapBigInt, PropertyKey, Symbol, Value},
};

pub(crate) struct BigIntPrototype;

struct BigIntPrototypeToLocaleString;
impl Builtin for BigIntPrototypeToLocaleString {
    const NAME: &'static str = "toLocaleString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntPrototype::to_locale_string);
}

struct BigIntPrototypeToString;
impl Builtin for BigIntPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntPrototype::to_string);
}

struct BigIntPrototypeValueOf;
impl Builtin for BigIntPrototypeValueOf {
    const NAME: &'static str = "valueOf";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(BigIntPrototype::value_of);
}

impl BigIntPrototype {
    /// ### [21.2.3.2 BigInt.prototype.toLocaleString ( \[ reserved1 \[ , reserved2 \] \] )](https://tc39.es/ecma262/#sec-bigint.prototype.tolocalestring)
    fn to_locale_string(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        let x = this_bigint_value(agent, this_value)?;
        Ok(Value::from_string(agent, x.to_string_radix(agent, 10)))
    }

    /// ### [21.2.3.3 BigInt.prototype.toString ( \[ radix \] )](https://tc39.es/ecma262/#sec-bigint.prototype.tostring)
    fn to_string(agent: &Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1. Let x be ? ThisBigIntValue(this value).
        let x = this_bigint_value(agent, this_value)?;
        let radix = arguments.get(0);
        // 2. If radix is undefined, let radixMV be 10.
        // 3. Else, let radixMV be ? ToIntegerOrInfinity(radix).
        let radix = if radix.is_undefined() {
            10.0
        } else {
            to_integer_or_infinity(agent, radix)?
        };
        // 4. If radixMV is not in the inclusive interval from 2 to 36, throw a
        // RangeError exception.
        if !(2.0..=36.0).contains(&radix) {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "toString() radix must be between 2 and 36",
            ));
        }
        // 5. Return BigInt::toString(x, radixMV).
        Ok(Value::from_string(agent, x.to_string_radix(agent, radix as u32)))
    }

    /// ### [21.2.3.4 BigInt.prototype.valueOf ( )](https://tc39.es/ecma262/#sec-bigint.prototype.valueof)
    fn value_of(agent: &Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1. Return ? ThisBigIntValue(this value).
        this_bigint_value(agent, this_value).map(Value::BigInt)
    }

    pub(crate) fn create_intrinsic(agent: &Agent, realm: Realm) {
        let intrinsics = realm.intrinsics(agent);
        let this = intrinsics.bigint_prototype();
        let to_string_tag = PropertyKey::Symbol(Symbol::TO_STRING_TAG);

        // The BigInt prototype object is not a BigInt object; it does not
        // have a [[BigIntData]] internal slot.
        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, this)
            .with_property_capacity(5)
            .with_prototype(intrinsics.object_prototype())
            .with_constructor_property(intrinsics.bigint())
            .with_builtin_function_property::<BigIntPrototypeToLocaleString>()
            .with_builtin_function_property::<BigIntPrototypeToString>()
            .with_builtin_function_property::<BigIntPrototypeValueOf>()
            .with_property(|property| {
                property
                    .with_key(to_string_tag)
                    .with_value_readonly(Value::from_str(agent, "BigInt"))
                    .with_enumerable(false)
                    .build()
            })
            .build();
    }
}

/// ### [21.2.3.4.1 ThisBigIntValue ( value )](https://tc39.es/ecma262/#sec-thisbigintvalue)
fn this_bigint_value(agent: &Agent, value: Value) -> JsResult<HeapBigInt> {
    let value = match value {
        Value::Object(o) => primitive_value(agent, o).unwrap_or(value),
        _ => value,
    };
    match value {
        // 1. If value is a BigInt, return value.
        // 2. If value is an Object and value has a [[BigIntData]] internal
        // slot, return value.[[BigIntData]].
        Value::BigInt(b) => Ok(b),
        // 3. Throw a TypeError exception.
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "BigInt.prototype method called on incompatible receiver",
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::evaluator::tests::run_to_string;

    #[test]
    fn to_string_with_radix() {
        assert_eq!(
            run_to_string("[(255n).toString(16), (-255n).toString(2), (10n ** 20n).toString()].join()"),
            "ff,-11111111,100000000000000000000"
        );
        assert_eq!(
            run_to_string("Object.prototype.toString.call(1n) + ':' + Object(3n).valueOf()"),
            "[object BigInt]:3"
        );
        assert_eq!(
            run_to_string("try { BigInt.prototype.valueOf.call(1) } catch (e) { e.name }"),
            "TypeError"
        );
    }
}
