// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.4 Operations on Iterator Objects](https://tc39.es/ecma262/#sec-operations-on-iterator-objects)

use super::{
    operations_on_objects::{call, call_function, get, get_method},
    type_conversion::to_boolean,
};
use crate::ecmascript::{
    builtins::ordinary::ordinary_object_create,
    execution::{Agent, JsError, JsResult, agent::ExceptionType},
    types::{Object, ObjectKind, PropertyKey, Symbol, Value},
};

/// ### [7.4.1 Iterator Records](https://tc39.es/ecma262/#sec-iterator-records)
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IteratorRecord {
    /// ### \[\[Iterator\]\]
    pub(crate) iterator: Object,
    /// ### \[\[NextMethod\]\]
    pub(crate) next_method: Value,
    /// ### \[\[Done\]\]
    pub(crate) done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IteratorKind {
    Sync,
    Async,
}

/// ### [7.4.2 GetIteratorDirect ( obj )](https://tc39.es/ecma262/#sec-getiteratordirect)
pub(crate) fn get_iterator_direct(agent: &Agent, obj: Object) -> JsResult<IteratorRecord> {
    // 1. Let nextMethod be ? Get(obj, "next").
    let key = PropertyKey::from_str(agent, "next");
    let next_method = get(agent, obj, key)?;
    // 2. Let iteratorRecord be the Iterator Record { [[Iterator]]: obj,
    // [[NextMethod]]: nextMethod, [[Done]]: false }.
    // 3. Return iteratorRecord.
    Ok(IteratorRecord {
        iterator: obj,
        next_method,
        done: false,
    })
}

/// ### [7.4.3 GetIteratorFromMethod ( obj, method )](https://tc39.es/ecma262/#sec-getiteratorfrommethod)
pub(crate) fn get_iterator_from_method(
    agent: &Agent,
    obj: Value,
    method: Object,
) -> JsResult<IteratorRecord> {
    // 1. Let iterator be ? Call(method, obj).
    let iterator = call_function(agent, method, obj, &[])?;
    // 2. If iterator is not an Object, throw a TypeError exception.
    let Value::Object(iterator) = iterator else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Result of the Symbol.iterator method is not an object",
        ));
    };
    // 3. Return ? GetIteratorDirect(iterator).
    get_iterator_direct(agent, iterator)
}

/// ### [7.4.4 GetIterator ( obj, kind )](https://tc39.es/ecma262/#sec-getiterator)
pub(crate) fn get_iterator(
    agent: &Agent,
    obj: Value,
    kind: IteratorKind,
) -> JsResult<IteratorRecord> {
    // 1. If kind is async, then
    let method = if kind == IteratorKind::Async {
        // a. Let method be ? GetMethod(obj, %Symbol.asyncIterator%).
        let method = get_method(agent, obj, Symbol::ASYNC_ITERATOR.into())?;
        // b. If method is undefined, then
        match method {
            Some(method) => method,
            None => {
                // i. Let syncMethod be ? GetMethod(obj, %Symbol.iterator%).
                // ii. If syncMethod is undefined, throw a TypeError exception.
                let sync_method = get_method(agent, obj, Symbol::ITERATOR.into())?
                    .ok_or_else(|| not_iterable(agent, obj))?;
                // iii. Let syncIteratorRecord be ? GetIteratorFromMethod(obj, syncMethod).
                let sync_iterator_record = get_iterator_from_method(agent, obj, sync_method)?;
                // iv. Return CreateAsyncFromSyncIterator(syncIteratorRecord).
                return create_async_from_sync_iterator(agent, sync_iterator_record);
            }
        }
    } else {
        // 2. Else,
        // a. Let method be ? GetMethod(obj, %Symbol.iterator%).
        get_method(agent, obj, Symbol::ITERATOR.into())?
            // 3. If method is undefined, throw a TypeError exception.
            .ok_or_else(|| not_iterable(agent, obj))?
    };
    // 4. Return ? GetIteratorFromMethod(obj, method).
    get_iterator_from_method(agent, obj, method)
}

fn not_iterable(agent: &Agent, obj: Value) -> JsError {
    agent.throw_exception(
        ExceptionType::TypeError,
        format!("{} is not iterable", obj.to_display_string(agent)),
    )
}

/// ### [7.4.6 IteratorNext ( iteratorRecord \[ , value \] )](https://tc39.es/ecma262/#sec-iteratornext)
pub(crate) fn iterator_next(
    agent: &Agent,
    iterator_record: &mut IteratorRecord,
    value: Option<Value>,
) -> JsResult<Object> {
    // 1. If value is not present, then
    //     a. Let result be Completion(Call(iteratorRecord.[[NextMethod]],
    //     iteratorRecord.[[Iterator]])).
    // 2. Else,
    //     a. Let result be Completion(Call(iteratorRecord.[[NextMethod]],
    //     iteratorRecord.[[Iterator]], « value »)).
    let arguments = value.as_slice();
    let result = call(
        agent,
        iterator_record.next_method,
        Value::Object(iterator_record.iterator),
        arguments,
    );
    // 3. If result is a throw completion, then
    //     a. Set iteratorRecord.[[Done]] to true.
    //     b. Return ? result.
    // 4. Set result to ! result.
    let result = result.inspect_err(|_| iterator_record.done = true)?;
    // 5. If result is not an Object, then
    let Value::Object(result) = result else {
        // a. Set iteratorRecord.[[Done]] to true.
        iterator_record.done = true;
        // b. Throw a TypeError exception.
        return Err(agent.throw_exception(
            ExceptionType::TypeError,
            format!(
                "Iterator result {} is not an object",
                result.to_display_string(agent)
            ),
        ));
    };
    // 6. Return result.
    Ok(result)
}

/// ### [7.4.7 IteratorComplete ( iteratorResult )](https://tc39.es/ecma262/#sec-iteratorcomplete)
pub(crate) fn iterator_complete(agent: &Agent, iter_result: Object) -> JsResult<bool> {
    // 1. Return ToBoolean(? Get(iteratorResult, "done")).
    let key = PropertyKey::from_str(agent, "done");
    Ok(to_boolean(agent, get(agent, iter_result, key)?))
}

/// ### [7.4.8 IteratorValue ( iteratorResult )](https://tc39.es/ecma262/#sec-iteratorvalue)
pub(crate) fn iterator_value(agent: &Agent, iter_result: Object) -> JsResult<Value> {
    // 1. Return ? Get(iteratorResult, "value").
    let key = PropertyKey::from_str(agent, "value");
    get(agent, iter_result, key)
}

/// ### [7.4.9 IteratorStep ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratorstep)
///
/// Returns the iterator result object, or None when the iterator is done.
pub(crate) fn iterator_step(
    agent: &Agent,
    iterator_record: &mut IteratorRecord,
) -> JsResult<Option<Object>> {
    // 1. Let result be ? IteratorNext(iteratorRecord).
    let result = iterator_next(agent, iterator_record, None)?;
    // 2. Let done be Completion(IteratorComplete(result)).
    // 3. If done is a throw completion, then
    //     a. Set iteratorRecord.[[Done]] to true.
    //     b. Return ? done.
    // 4. Set done to ! done.
    let done = iterator_complete(agent, result).inspect_err(|_| iterator_record.done = true)?;
    // 5. If done is true, then
    if done {
        // a. Set iteratorRecord.[[Done]] to true.
        iterator_record.done = true;
        // b. Return DONE.
        return Ok(None);
    }
    // 6. Return result.
    Ok(Some(result))
}

/// ### [7.4.10 IteratorStepValue ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratorstepvalue)
///
/// Returns the next value, or None when the iterator is done.
pub(crate) fn iterator_step_value(
    agent: &Agent,
    iterator_record: &mut IteratorRecord,
) -> JsResult<Option<Value>> {
    // 1. Let result be ? IteratorStep(iteratorRecord).
    // 2. If result is DONE, then
    //     a. Return DONE.
    let Some(result) = iterator_step(agent, iterator_record)? else {
        return Ok(None);
    };
    // 3. Let value be Completion(IteratorValue(result)).
    // 4. If value is a throw completion, then
    //     a. Set iteratorRecord.[[Done]] to true.
    // 5. Return ? value.
    iterator_value(agent, result)
        .inspect_err(|_| iterator_record.done = true)
        .map(Some)
}

/// ### [7.4.11 IteratorClose ( iteratorRecord, completion )](https://tc39.es/ecma262/#sec-iteratorclose)
///
/// A throw completion is returned unchanged after the iterator has been
/// told to close. Internal errors close nothing.
pub(crate) fn iterator_close<T>(
    agent: &Agent,
    iterator: Object,
    completion: JsResult<T>,
) -> JsResult<T> {
    if let Err(JsError::Internal(_)) = completion {
        return completion;
    }
    // 1. Assert: iteratorRecord.[[Iterator]] is an Object.
    // 2. Let iterator be iteratorRecord.[[Iterator]].
    // 3. Let innerResult be Completion(GetMethod(iterator, "return")).
    let key = PropertyKey::from_str(agent, "return");
    let inner_result = get_method(agent, Value::Object(iterator), key);
    // 4. If innerResult is a normal completion, then
    let inner_result = match inner_result {
        Ok(None) => {
            // b. If return is undefined, return ? completion.
            return completion;
        }
        Ok(Some(return_method)) => {
            // c. Set innerResult to Completion(Call(return, iterator)).
            call_function(agent, return_method, Value::Object(iterator), &[])
        }
        Err(error) => Err(error),
    };
    // 5. If completion is a throw completion, return ? completion.
    let completion = completion?;
    // 6. If innerResult is a throw completion, return ? innerResult.
    let inner_result = inner_result?;
    // 7. If innerResult.[[Value]] is not an Object, throw a TypeError exception.
    if !inner_result.is_object() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Iterator return method result is not an object",
        ));
    }
    // 8. Return ? completion.
    Ok(completion)
}

/// ### [7.4.13 IfAbruptCloseIterator ( value, iteratorRecord )](https://tc39.es/ecma262/#sec-ifabruptcloseiterator)
pub(crate) fn if_abrupt_close_iterator<T>(
    agent: &Agent,
    value: JsResult<T>,
    iterator_record: &IteratorRecord,
) -> JsResult<T> {
    // 1. Assert: value is a Completion Record.
    // 2. If value is an abrupt completion, return ? IteratorClose(iteratorRecord, value).
    // 3. Else, set value to ! value.
    match value {
        Err(_) => iterator_close(agent, iterator_record.iterator, value),
        Ok(value) => Ok(value),
    }
}

/// ### [7.4.14 CreateIteratorResultObject ( value, done )](https://tc39.es/ecma262/#sec-createiterresultobject)
pub(crate) fn create_iter_result_object(agent: &Agent, value: Value, done: bool) -> Object {
    // 1. Let obj be OrdinaryObjectCreate(%Object.prototype%).
    let obj = ordinary_object_create(agent, Some(agent.intrinsics().object_prototype()));
    // 2. Perform ! CreateDataPropertyOrThrow(obj, "value", value).
    let key = PropertyKey::from_str(agent, "value");
    obj.set_data_slot(agent, key, value);
    // 3. Perform ! CreateDataPropertyOrThrow(obj, "done", done).
    let key = PropertyKey::from_str(agent, "done");
    obj.set_data_slot(agent, key, Value::Boolean(done));
    // 4. Return obj.
    obj
}

/// ### [7.4.16 IteratorToList ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratortolist)
pub(crate) fn iterator_to_list(
    agent: &Agent,
    iterator_record: &mut IteratorRecord,
) -> JsResult<Vec<Value>> {
    // 1. Let values be a new empty List.
    let mut values = Vec::new();
    // 2. Repeat,
    //     a. Let next be ? IteratorStepValue(iteratorRecord).
    //     b. If next is DONE, then
    //         i. Return values.
    //     c. Append next to values.
    while let Some(next) = iterator_step_value(agent, iterator_record)? {
        values.push(next);
    }
    Ok(values)
}

/// Collect the values of an iterable: GetIterator followed by
/// IteratorToList.
pub(crate) fn iterable_to_list(agent: &Agent, items: Value) -> JsResult<Vec<Value>> {
    let mut iterator_record = get_iterator(agent, items, IteratorKind::Sync)?;
    iterator_to_list(agent, &mut iterator_record)
}

/// ### [27.1.6.1 CreateAsyncFromSyncIterator ( syncIteratorRecord )](https://tc39.es/ecma262/#sec-createasyncfromsynciterator)
pub(crate) fn create_async_from_sync_iterator(
    agent: &Agent,
    sync_iterator_record: IteratorRecord,
) -> JsResult<IteratorRecord> {
    // 1. Let asyncIterator be OrdinaryObjectCreate(%AsyncFromSyncIteratorPrototype%,
    // « [[SyncIteratorRecord]] »).
    let prototype = agent.intrinsics().async_from_sync_iterator_prototype();
    let async_iterator = Object::create(
        agent,
        Some(prototype),
        // 2. Set asyncIterator.[[SyncIteratorRecord]] to syncIteratorRecord.
        ObjectKind::AsyncFromSyncIterator(sync_iterator_record),
    );
    // 3. Let nextMethod be ! Get(asyncIterator, "next").
    // 4. Let iteratorRecord be the Iterator Record { [[Iterator]]:
    // asyncIterator, [[NextMethod]]: nextMethod, [[Done]]: false }.
    // 5. Return iteratorRecord.
    get_iterator_direct(agent, async_iterator)
}
