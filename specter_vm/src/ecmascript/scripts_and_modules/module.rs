// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [16.2 Modules](https://tc39.es/ecma262/#sec-modules)
//!
//! Source Text Module Records and the Cyclic Module Record algorithms that
//! load, link and evaluate a module graph.
//!
//! Modules are loaded synchronously through
//! [`HostHooks::load_imported_module`](crate::ecmascript::execution::agent::HostHooks::load_imported_module)
//! and top-level `await` is rejected by the parser, so no module is ever
//! asynchronous: the evaluating-async states and the async parent
//! bookkeeping of Cyclic Module Records do not exist here.

use std::{
    cell::{Ref, RefMut},
    rc::Rc,
};

use specter_ast::{
    ast::{Atom, DefaultExport, ExportDeclaration, ImportName, Module, Statement},
    scope_analysis::{DEFAULT_EXPORT_BINDING, LexicallyScopedDeclaration},
};

use super::{ScriptOrModule, script::ScriptIdentifier};
use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::create_data_property_or_throw, type_conversion::to_string,
        },
        builtins::{
            builtin_function::create_anonymous_builtin_function,
            control_abstraction_objects::promise_objects::promise_abstract_operations::{
                PromiseCapability, if_abrupt_reject_promise, perform_promise_then,
                promise_settled_state,
            },
            module_namespace::module_namespace_create,
            ordinary::ordinary_object_create,
        },
        execution::{
            Agent, ECMAScriptCodeEvaluationState, EnvironmentIndex, EvaluationError,
            ExecutionContext, JsError, JsResult, ModuleEnvironment, Realm,
            agent::{ExceptionType, get_active_script_or_module},
            new_module_environment,
        },
        types::{HeapString, Object, PropertyKey, Value},
    },
    engine::{
        evaluator::{evaluate_statement_list, function_definitions::instantiate_function_object},
        run_sync,
    },
};

/// Handle to a [`ModuleRecord`] in the agent heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ModuleIdentifier(u32);

/// ### \[\[Status\]\]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleStatus {
    /// Some module of the graph has not been loaded yet.
    New,
    Unlinked,
    Linking,
    Linked,
    Evaluating,
    Evaluated,
}

/// ### [ImportEntry Records](https://tc39.es/ecma262/#importentry-record)
#[derive(Debug, Clone)]
struct ImportEntry {
    /// ### \[\[ModuleRequest\]\]
    module_request: Atom,
    /// ### \[\[ImportName\]\]
    ///
    /// None for a namespace import (`import * as ns`).
    import_name: Option<HeapString>,
    /// ### \[\[LocalName\]\]
    local_name: HeapString,
}

/// The \[\[ImportName\]\] of an ExportEntry Record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportImportName {
    Name(HeapString),
    /// `export * as ns from "m"`
    All,
    /// `export * from "m"`
    AllButDefault,
}

/// ### [ExportEntry Records](https://tc39.es/ecma262/#exportentry-record)
#[derive(Debug, Clone)]
struct ExportEntry {
    export_name: Option<HeapString>,
    module_request: Option<Atom>,
    import_name: Option<ExportImportName>,
    local_name: Option<HeapString>,
}

/// ### [16.2.1.7 Source Text Module Records](https://tc39.es/ecma262/#sec-source-text-module-records)
#[derive(Debug)]
pub(crate) struct ModuleRecord {
    /// ### \[\[Realm\]\]
    realm: Realm,
    /// ### \[\[Environment\]\]
    ///
    /// None until the module is linked.
    environment: Option<ModuleEnvironment>,
    /// ### \[\[Namespace\]\]
    namespace: Option<Object>,
    /// ### \[\[HostDefined\]\]
    ///
    /// The key the host loaded this module under.
    host_defined: Option<Rc<str>>,
    /// ### \[\[ECMAScriptCode\]\]
    ecmascript_code: Rc<Module>,
    /// ### \[\[ImportMeta\]\]
    import_meta: Option<Object>,
    status: ModuleStatus,
    /// ### \[\[EvaluationError\]\]
    evaluation_error: Option<JsError>,
    /// ### \[\[DFSIndex\]\]
    dfs_index: u32,
    /// ### \[\[DFSAncestorIndex\]\]
    dfs_ancestor_index: u32,
    /// ### \[\[RequestedModules\]\]
    ///
    /// The specifiers of the imports in source text order, without
    /// duplicates.
    requested_modules: Vec<Atom>,
    /// ### \[\[LoadedModules\]\]
    loaded_modules: Vec<(Atom, ModuleIdentifier)>,
    /// ### \[\[CycleRoot\]\]
    cycle_root: Option<ModuleIdentifier>,
    /// ### \[\[TopLevelCapability\]\]
    top_level_capability: Option<PromiseCapability>,
    /// ### \[\[ImportEntries\]\]
    import_entries: Vec<ImportEntry>,
    /// ### \[\[LocalExportEntries\]\]
    local_export_entries: Vec<ExportEntry>,
    /// ### \[\[IndirectExportEntries\]\]
    indirect_export_entries: Vec<ExportEntry>,
    /// ### \[\[StarExportEntries\]\]
    star_export_entries: Vec<ExportEntry>,
}

/// ### [ResolvedBinding Records](https://tc39.es/ecma262/#resolvedbinding-record)
///
/// The result of ResolveExport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolvedExport {
    Resolved {
        module: ModuleIdentifier,
        /// None if the export is the namespace object of `module`.
        binding_name: Option<HeapString>,
    },
    /// Several star exports provide the name.
    Ambiguous,
    /// No definition was found, or the request is circular.
    Unresolvable,
}

/// The record on whose behalf a module is loaded.
#[derive(Debug, Clone, Copy)]
enum Referrer {
    Script(ScriptIdentifier),
    Module(ModuleIdentifier),
    Realm(Realm),
}

impl Referrer {
    fn realm(self, agent: &Agent) -> Realm {
        match self {
            Referrer::Script(script) => script.realm(agent),
            Referrer::Module(module) => module.realm(agent),
            Referrer::Realm(realm) => realm,
        }
    }

    fn host_defined(self, agent: &Agent) -> Option<Rc<str>> {
        match self {
            Referrer::Script(script) => ScriptOrModule::Script(script).host_defined(agent),
            Referrer::Module(module) => ScriptOrModule::Module(module).host_defined(agent),
            Referrer::Realm(_) => None,
        }
    }

    fn loaded_module(self, agent: &Agent, specifier: &str) -> Option<ModuleIdentifier> {
        match self {
            Referrer::Script(script) => script.loaded_module(agent, specifier),
            Referrer::Module(module) => module.loaded_module(agent, specifier),
            Referrer::Realm(_) => None,
        }
    }

    fn insert_loaded_module(self, agent: &Agent, specifier: Atom, module: ModuleIdentifier) {
        match self {
            Referrer::Script(script) => script.insert_loaded_module(agent, specifier, module),
            Referrer::Module(referrer) => agent.heap_mut().modules[referrer.0 as usize]
                .loaded_modules
                .push((specifier, module)),
            Referrer::Realm(_) => {}
        }
    }
}

impl ModuleIdentifier {
    fn record(self, agent: &Agent) -> Ref<'_, ModuleRecord> {
        Ref::map(agent.heap(), |heap| &heap.modules[self.0 as usize])
    }

    fn record_mut(self, agent: &Agent) -> RefMut<'_, ModuleRecord> {
        RefMut::map(agent.heap_mut(), |heap| &mut heap.modules[self.0 as usize])
    }

    pub(crate) fn realm(self, agent: &Agent) -> Realm {
        self.record(agent).realm
    }

    /// ### \[\[Environment\]\]
    pub(crate) fn environment(self, agent: &Agent) -> Option<ModuleEnvironment> {
        self.record(agent).environment
    }

    pub(crate) fn host_defined(self, agent: &Agent) -> Option<Rc<str>> {
        self.record(agent).host_defined.clone()
    }

    fn status(self, agent: &Agent) -> ModuleStatus {
        self.record(agent).status
    }

    fn set_status(self, agent: &Agent, status: ModuleStatus) {
        tracing::trace!(event = "module_status", module = self.0, ?status);
        self.record_mut(agent).status = status;
    }

    fn dfs_index(self, agent: &Agent) -> u32 {
        self.record(agent).dfs_index
    }

    fn dfs_ancestor_index(self, agent: &Agent) -> u32 {
        self.record(agent).dfs_ancestor_index
    }

    fn set_dfs_ancestor_index(self, agent: &Agent, index: u32) {
        self.record_mut(agent).dfs_ancestor_index = index;
    }

    fn evaluation_error(self, agent: &Agent) -> Option<JsError> {
        self.record(agent).evaluation_error.clone()
    }

    fn requested_modules(self, agent: &Agent) -> Vec<Atom> {
        self.record(agent).requested_modules.clone()
    }

    fn loaded_module(self, agent: &Agent, specifier: &str) -> Option<ModuleIdentifier> {
        self.record(agent)
            .loaded_modules
            .iter()
            .find(|(loaded, _)| &**loaded == specifier)
            .map(|(_, module)| *module)
    }

    /// ### [16.2.1.9 GetImportedModule ( referrer, request )](https://tc39.es/ecma262/#sec-GetImportedModule)
    fn get_imported_module(self, agent: &Agent, specifier: &str) -> JsResult<ModuleIdentifier> {
        // 1. Let records be a List consisting of each LoadedModuleRequest
        // Record r of referrer.[[LoadedModules]] such that
        // ModuleRequestsEqual(r, request) is true.
        // 2. Assert: records has exactly one element, since LoadRequestedModules
        // has completed successfully on referrer prior to invoking this
        // abstract operation.
        // 3. Let record be the sole element of records.
        // 4. Return record.[[Module]].
        self.loaded_module(agent, specifier).ok_or_else(|| {
            agent.internal_error(format!("module request '{specifier}' was not loaded"))
        })
    }

    /// ### [16.2.1.7.2.1 GetExportedNames ( \[ exportStarSet \] )](https://tc39.es/ecma262/#sec-getexportednames)
    fn get_exported_names(
        self,
        agent: &Agent,
        export_star_set: &mut Vec<ModuleIdentifier>,
    ) -> Vec<HeapString> {
        // 1. Assert: module.[[Status]] is not new.
        debug_assert_ne!(self.status(agent), ModuleStatus::New);
        // 2. If exportStarSet is not present, set exportStarSet to a new empty
        // List.
        // 3. If exportStarSet contains module, then
        if export_star_set.contains(&self) {
            // a. Assert: We've reached the starting point of an export *
            // circularity.
            // b. Return a new empty List.
            return Vec::new();
        }
        // 4. Append module to exportStarSet.
        export_star_set.push(self);
        // 5. Let exportedNames be a new empty List.
        // 6. For each ExportEntry Record e of module.[[LocalExportEntries]], do
        // 7. For each ExportEntry Record e of module.[[IndirectExportEntries]], do
        //     a. Assert: e.[[ExportName]] is not null.
        //     b. Append e.[[ExportName]] to exportedNames.
        let (mut exported_names, star_export_entries) = {
            let record = self.record(agent);
            let names: Vec<HeapString> = record
                .local_export_entries
                .iter()
                .chain(&record.indirect_export_entries)
                .filter_map(|e| e.export_name)
                .collect();
            (names, record.star_export_entries.clone())
        };
        let default = HeapString::from_str(agent, "default");
        // 8. For each ExportEntry Record e of module.[[StarExportEntries]], do
        for e in star_export_entries {
            // a. Assert: e.[[ModuleRequest]] is not null.
            // b. Let requestedModule be GetImportedModule(module, e.[[ModuleRequest]]).
            let Some(requested_module) = e
                .module_request
                .and_then(|request| self.loaded_module(agent, &request))
            else {
                continue;
            };
            // c. Let starNames be requestedModule.GetExportedNames(exportStarSet).
            let star_names = requested_module.get_exported_names(agent, export_star_set);
            // d. For each element n of starNames, do
            for n in star_names {
                // i. If n is not "default", then
                //     1. If exportedNames does not contain n, then
                //         a. Append n to exportedNames.
                if n != default && !exported_names.contains(&n) {
                    exported_names.push(n);
                }
            }
        }
        // 9. Return exportedNames.
        exported_names
    }

    /// ### [16.2.1.7.2.2 ResolveExport ( exportName \[ , resolveSet \] )](https://tc39.es/ecma262/#sec-resolveexport)
    ///
    /// ResolveExport attempts to resolve an imported binding to the actual
    /// defining module and local binding name. The defining module may be
    /// this module or some other module that is imported by it.
    pub(crate) fn resolve_export(self, agent: &Agent, export_name: HeapString) -> ResolvedExport {
        self.inner_resolve_export(agent, export_name, &mut Vec::new())
    }

    fn inner_resolve_export(
        self,
        agent: &Agent,
        export_name: HeapString,
        resolve_set: &mut Vec<(ModuleIdentifier, HeapString)>,
    ) -> ResolvedExport {
        // 1. Assert: module.[[Status]] is not new.
        // 2. If resolveSet is not present, set resolveSet to a new empty List.
        // 3. For each Record { [[Module]], [[ExportName]] } r of resolveSet, do
        //     a. If module and r.[[Module]] are the same Module Record and
        //     exportName is r.[[ExportName]], then
        if resolve_set.contains(&(self, export_name)) {
            // i. Assert: This is a circular import request.
            // ii. Return null.
            return ResolvedExport::Unresolvable;
        }
        // 4. Append the Record { [[Module]]: module, [[ExportName]]: exportName }
        // to resolveSet.
        resolve_set.push((self, export_name));
        let (local_export_entries, indirect_export_entries, star_export_entries) = {
            let record = self.record(agent);
            (
                record.local_export_entries.clone(),
                record.indirect_export_entries.clone(),
                record.star_export_entries.clone(),
            )
        };
        // 5. For each ExportEntry Record e of module.[[LocalExportEntries]], do
        for e in local_export_entries {
            // a. If e.[[ExportName]] is exportName, then
            if e.export_name == Some(export_name) {
                // i. Assert: module provides the direct binding for this export.
                // ii. Return ResolvedBinding Record { [[Module]]: module,
                // [[BindingName]]: e.[[LocalName]] }.
                return ResolvedExport::Resolved {
                    module: self,
                    binding_name: e.local_name,
                };
            }
        }
        // 6. For each ExportEntry Record e of module.[[IndirectExportEntries]], do
        for e in indirect_export_entries {
            // a. If e.[[ExportName]] is exportName, then
            if e.export_name != Some(export_name) {
                continue;
            }
            // i. Assert: e.[[ModuleRequest]] is not null.
            // ii. Let importedModule be GetImportedModule(module, e.[[ModuleRequest]]).
            let Some(imported_module) = e
                .module_request
                .and_then(|request| self.loaded_module(agent, &request))
            else {
                return ResolvedExport::Unresolvable;
            };
            return match e.import_name {
                // iii. If e.[[ImportName]] is ALL, then
                //     1. Assert: module does not provide the direct binding for
                //     this export.
                //     2. Return ResolvedBinding Record { [[Module]]:
                //     importedModule, [[BindingName]]: NAMESPACE }.
                Some(ExportImportName::All) => ResolvedExport::Resolved {
                    module: imported_module,
                    binding_name: None,
                },
                // iv. Else,
                //     1. Assert: module imports a specific binding for this
                //     export.
                //     2. Assert: e.[[ImportName]] is a String.
                //     3. Return importedModule.ResolveExport(e.[[ImportName]],
                //     resolveSet).
                Some(ExportImportName::Name(import_name)) => {
                    imported_module.inner_resolve_export(agent, import_name, resolve_set)
                }
                Some(ExportImportName::AllButDefault) | None => ResolvedExport::Unresolvable,
            };
        }
        // 7. If exportName is "default", then
        if export_name == HeapString::from_str(agent, "default") {
            // a. Assert: A default export was not explicitly defined by this
            // module.
            // b. Return null.
            // c. NOTE: A default export cannot be provided by an export * from
            // "mod" declaration.
            return ResolvedExport::Unresolvable;
        }
        // 8. Let starResolution be null.
        let mut star_resolution: Option<(ModuleIdentifier, Option<HeapString>)> = None;
        // 9. For each ExportEntry Record e of module.[[StarExportEntries]], do
        for e in star_export_entries {
            // a. Assert: e.[[ModuleRequest]] is not null.
            // b. Let importedModule be GetImportedModule(module, e.[[ModuleRequest]]).
            let Some(imported_module) = e
                .module_request
                .and_then(|request| self.loaded_module(agent, &request))
            else {
                continue;
            };
            // c. Let resolution be importedModule.ResolveExport(exportName,
            // resolveSet).
            match imported_module.inner_resolve_export(agent, export_name, resolve_set) {
                // d. If resolution is AMBIGUOUS, return AMBIGUOUS.
                ResolvedExport::Ambiguous => return ResolvedExport::Ambiguous,
                ResolvedExport::Unresolvable => {}
                // e. If resolution is not null, then
                //     i. Assert: resolution is a ResolvedBinding Record.
                ResolvedExport::Resolved {
                    module,
                    binding_name,
                } => match star_resolution {
                    // ii. If starResolution is null, then
                    //     1. Set starResolution to resolution.
                    None => star_resolution = Some((module, binding_name)),
                    // iii. Else,
                    //     1. Assert: There is more than one * import that
                    //     includes the requested name.
                    //     2. If resolution.[[Module]] and
                    //     starResolution.[[Module]] are not the same Module
                    //     Record, return AMBIGUOUS.
                    //     3. If resolution.[[BindingName]] is not
                    //     starResolution.[[BindingName]], return AMBIGUOUS.
                    Some((star_module, star_binding_name)) => {
                        if module != star_module || binding_name != star_binding_name {
                            return ResolvedExport::Ambiguous;
                        }
                    }
                },
            }
        }
        // 10. Return starResolution.
        match star_resolution {
            Some((module, binding_name)) => ResolvedExport::Resolved {
                module,
                binding_name,
            },
            None => ResolvedExport::Unresolvable,
        }
    }

    /// ### [16.2.1.6.1.1 Link ( )](https://tc39.es/ecma262/#sec-moduledeclarationlinking)
    ///
    /// On success, Link transitions this module's \[\[Status\]\] from
    /// unlinked to linked. On failure, an exception is thrown and this
    /// module's \[\[Status\]\] remains unlinked.
    pub(crate) fn link(self, agent: &Agent) -> JsResult<()> {
        // 1. Assert: module.[[Status]] is one of unlinked, linked,
        // evaluating-async, or evaluated.
        // 2. Let stack be a new empty List.
        let mut stack = Vec::new();
        // 3. Let result be Completion(InnerModuleLinking(module, stack, 0)).
        // 4. If result is an abrupt completion, then
        if let Err(error) = inner_module_linking(agent, self, &mut stack, 0) {
            // a. For each Cyclic Module Record m of stack, do
            for m in stack {
                // i. Assert: m.[[Status]] is linking.
                // ii. Set m.[[Status]] to unlinked.
                m.set_status(agent, ModuleStatus::Unlinked);
            }
            // b. Assert: module.[[Status]] is unlinked.
            // c. Return ? result.
            return Err(error);
        }
        tracing::debug!(event = "module_linked", module = self.0);
        // 5. Assert: module.[[Status]] is one of linked, evaluating-async, or
        // evaluated.
        // 6. Assert: stack is empty.
        // 7. Return UNUSED.
        Ok(())
    }

    /// ### [16.2.1.6.1.3 Evaluate ( )](https://tc39.es/ecma262/#sec-moduleevaluation)
    ///
    /// Returns the promise of the evaluation. The first call on a module of a
    /// strongly connected component creates it; later calls on any module of
    /// the component return the same promise.
    pub(crate) fn evaluate(self, agent: &Agent) -> JsResult<Object> {
        // 1. Assert: This call to Evaluate is not happening at the same time
        // as another call to Evaluate within the surrounding agent.
        // 2. Assert: module.[[Status]] is one of linked, evaluating-async, or
        // evaluated.
        // 3. If module.[[Status]] is either evaluating-async or evaluated, set
        // module to module.[[CycleRoot]].
        let module = if self.status(agent) == ModuleStatus::Evaluated {
            self.record(agent).cycle_root.unwrap_or(self)
        } else {
            self
        };
        // 4. If module.[[TopLevelCapability]] is not EMPTY, then
        if let Some(capability) = module.record(agent).top_level_capability {
            // a. Return module.[[TopLevelCapability]].[[Promise]].
            return Ok(capability.promise());
        }
        // 5. Let stack be a new empty List.
        let mut stack = Vec::new();
        // 6. Let capability be ! NewPromiseCapability(%Promise%).
        let capability = PromiseCapability::new_intrinsic(agent);
        // 7. Set module.[[TopLevelCapability]] to capability.
        module.record_mut(agent).top_level_capability = Some(capability);
        // 8. Let result be Completion(InnerModuleEvaluation(module, stack, 0)).
        let result = inner_module_evaluation(agent, module, &mut stack, 0);
        match result {
            // 9. If result is an abrupt completion, then
            Err(error) => {
                // a. For each Cyclic Module Record m of stack, do
                for m in stack {
                    // i. Assert: m.[[Status]] is evaluating.
                    // ii. Assert: m.[[AsyncEvaluationOrder]] is unset.
                    // iii. Set m.[[Status]] to evaluated.
                    m.set_status(agent, ModuleStatus::Evaluated);
                    // iv. Set m.[[EvaluationError]] to result.
                    m.record_mut(agent).evaluation_error = Some(error.clone());
                }
                // b. Assert: module.[[Status]] is evaluated.
                // c. Assert: module.[[EvaluationError]] and result are the same
                // Completion Record.
                // d. Perform ! Call(capability.[[Reject]], undefined, «
                // result.[[Value]] »).
                let Some(reason) = error.value() else {
                    return Err(error);
                };
                tracing::debug!(event = "module_evaluation_failed", module = module.0);
                capability.reject(agent, reason)?;
            }
            // 10. Else,
            Ok(_) => {
                // a. Assert: module.[[Status]] is either evaluating-async or
                // evaluated.
                // b. Assert: module.[[EvaluationError]] is EMPTY.
                // c. If module.[[AsyncEvaluationOrder]] is unset, then
                //     i. Assert: module.[[Status]] is evaluated.
                //     ii. Perform ! Call(capability.[[Resolve]], undefined, «
                //     undefined »).
                // d. Assert: stack is empty.
                capability.resolve(agent, Value::Undefined)?;
            }
        }
        // 11. Return capability.[[Promise]].
        Ok(capability.promise())
    }

    /// ### [16.2.1.7.3.1 InitializeEnvironment ( )](https://tc39.es/ecma262/#sec-source-text-module-record-initialize-environment)
    fn initialize_environment(self, agent: &Agent) -> JsResult<()> {
        let (indirect_export_entries, import_entries, code, realm) = {
            let record = self.record(agent);
            (
                record.indirect_export_entries.clone(),
                record.import_entries.clone(),
                record.ecmascript_code.clone(),
                record.realm,
            )
        };
        // 1. For each ExportEntry Record e of module.[[IndirectExportEntries]], do
        for e in &indirect_export_entries {
            // a. Assert: e.[[ExportName]] is not null.
            let Some(export_name) = e.export_name else {
                continue;
            };
            // b. Let resolution be module.ResolveExport(e.[[ExportName]]).
            // c. If resolution is either null or AMBIGUOUS, throw a SyntaxError
            // exception.
            // d. Assert: resolution is a ResolvedBinding Record.
            let resolution = self.resolve_export(agent, export_name);
            let request = e.module_request.as_deref().unwrap_or_default();
            check_resolution(agent, resolution, request, export_name)?;
        }
        // 2. Assert: All named exports from module are resolvable.
        // 3. Let realm be module.[[Realm]].
        // 4. Assert: realm is not undefined.
        // 5. Let env be NewModuleEnvironment(realm.[[GlobalEnv]]).
        let global_env = EnvironmentIndex::Global(realm.global_env(agent));
        let env = new_module_environment(agent, Some(global_env));
        // 6. Set module.[[Environment]] to env.
        self.record_mut(agent).environment = Some(env);
        let declarative_env = env.declarative_environment(agent);
        // 7. For each ImportEntry Record in of module.[[ImportEntries]], do
        for entry in import_entries {
            // a. Let importedModule be GetImportedModule(module, in.[[ModuleRequest]]).
            let imported_module = self.get_imported_module(agent, &entry.module_request)?;
            let namespace = match entry.import_name {
                // b. If in.[[ImportName]] is NAMESPACE-OBJECT, then
                //     i. Let namespace be GetModuleNamespace(importedModule).
                None => get_module_namespace(agent, imported_module),
                // c. Else,
                Some(import_name) => {
                    // i. Let resolution be importedModule.ResolveExport(in.[[ImportName]]).
                    // ii. If resolution is either null or AMBIGUOUS, throw a
                    // SyntaxError exception.
                    let resolution = imported_module.resolve_export(agent, import_name);
                    let (module, binding_name) =
                        check_resolution(agent, resolution, &entry.module_request, import_name)?;
                    match binding_name {
                        // iii. If resolution.[[BindingName]] is NAMESPACE, then
                        //     1. Let namespace be GetModuleNamespace(resolution.[[Module]]).
                        None => get_module_namespace(agent, module),
                        // iv. Else,
                        //     1. Perform CreateImportBinding(env, in.[[LocalName]],
                        //     resolution.[[Module]], resolution.[[BindingName]]).
                        Some(binding_name) => {
                            env.create_import_binding(
                                agent,
                                entry.local_name,
                                module,
                                binding_name,
                            );
                            continue;
                        }
                    }
                }
            };
            // 2. Perform ! env.CreateImmutableBinding(in.[[LocalName]], true).
            // 3. Perform ! env.InitializeBinding(in.[[LocalName]], namespace).
            declarative_env.create_immutable_binding(agent, entry.local_name, true);
            declarative_env.initialize_binding(agent, entry.local_name, Value::Object(namespace));
        }
        // 8. Let moduleContext be a new ECMAScript code execution context.
        // 9. Set the Function of moduleContext to null.
        // 10. Assert: module.[[Realm]] is not undefined.
        // 11. Set the Realm of moduleContext to module.[[Realm]].
        // 12. Set the ScriptOrModule of moduleContext to module.
        // 13. Set the VariableEnvironment of moduleContext to module.[[Environment]].
        // 14. Set the LexicalEnvironment of moduleContext to module.[[Environment]].
        // 15. Set the PrivateEnvironment of moduleContext to null.
        // 16. Set module.[[Context]] to moduleContext.
        // 17. Push moduleContext onto the execution context stack;
        // moduleContext is now the running execution context.
        let depth = agent.execution_context_depth();
        agent.push_execution_context(self.module_context(agent, env));
        // 18. Let code be module.[[ECMAScriptCode]].
        // 19. Let varDeclarations be the VarScopedDeclarations of code.
        // 20. Let declaredVarNames be a new empty List.
        // 21. For each element d of varDeclarations, do
        //     a. For each element dn of the BoundNames of d, do
        for name in &code.scope.var_names {
            let name = HeapString::from_str(agent, name);
            // i. If declaredVarNames does not contain dn, then
            if declarative_env.has_binding(agent, name) {
                continue;
            }
            // 1. Perform ! env.CreateMutableBinding(dn, false).
            declarative_env.create_mutable_binding(agent, name, false);
            // 2. Perform ! env.InitializeBinding(dn, undefined).
            declarative_env.initialize_binding(agent, name, Value::Undefined);
            // 3. Append dn to declaredVarNames.
        }
        // 22. Let lexDeclarations be the LexicallyScopedDeclarations of code.
        // 23. Let privateEnv be null.
        // 24. For each element d of lexDeclarations, do
        for declaration in &code.scope.lexical_declarations {
            // a. For each element dn of the BoundNames of d, do
            let name = HeapString::from_str(agent, declaration.name());
            if declaration.is_constant_declaration() {
                // i. If IsConstantDeclaration of d is true, then
                //     1. Perform ! env.CreateImmutableBinding(dn, true).
                declarative_env.create_immutable_binding(agent, name, true);
            } else {
                // ii. Else,
                //     1. Perform ! env.CreateMutableBinding(dn, false).
                declarative_env.create_mutable_binding(agent, name, false);
            }
            // iii. If d is either a FunctionDeclaration, a GeneratorDeclaration,
            // an AsyncFunctionDeclaration, or an AsyncGeneratorDeclaration, then
            if let LexicallyScopedDeclaration::Function(function) = declaration {
                // 1. Let fo be InstantiateFunctionObject of d with arguments
                // env and privateEnv.
                let fo = instantiate_function_object(
                    agent,
                    function,
                    EnvironmentIndex::Module(env),
                    None,
                );
                // 2. Perform ! env.InitializeBinding(dn, fo).
                declarative_env.initialize_binding(agent, name, Value::Object(fo));
            }
        }
        // 25. Remove moduleContext from the execution context stack.
        agent.truncate_execution_context_stack(depth);
        // 26. Return UNUSED.
        Ok(())
    }

    /// ### [16.2.1.7.3.2 ExecuteModule ( \[ capability \] )](https://tc39.es/ecma262/#sec-source-text-module-record-execute-module)
    fn execute_module(self, agent: &Agent) -> JsResult<()> {
        let Some(env) = self.environment(agent) else {
            return Err(agent.internal_error("executing a module that was not linked"));
        };
        let code = self.record(agent).ecmascript_code.clone();
        // 1. Let moduleContext be a new ECMAScript code execution context.
        // 2. Set the Function of moduleContext to null.
        // 3. Set the Realm of moduleContext to module.[[Realm]].
        // 4. Set the ScriptOrModule of moduleContext to module.
        // 5. Assert: module has been linked and declarations in its module
        // environment have been instantiated.
        // 6. Set the VariableEnvironment of moduleContext to module.[[Environment]].
        // 7. Set the LexicalEnvironment of moduleContext to module.[[Environment]].
        // 8. Suspend the running execution context.
        // 9. If module.[[HasTLA]] is false, then
        //     a. Assert: capability is not present.
        //     b. Push moduleContext onto the execution context stack;
        //     moduleContext is now the running execution context.
        let depth = agent.execution_context_depth();
        agent.push_execution_context(self.module_context(agent, env));
        tracing::trace!(event = "execute_module", module = self.0);
        //     c. Let result be Completion(Evaluation of module.[[ECMAScriptCode]]).
        let result = run_sync(agent, async {
            match evaluate_statement_list(agent, &code.body).await {
                Ok(value) => Ok(value),
                Err(completion) => completion.into_script_result(agent),
            }
        });
        //     d. Suspend moduleContext and remove it from the execution
        //     context stack.
        //     e. Resume the context that is now on the top of the execution
        //     context stack as the running execution context.
        agent.truncate_execution_context_stack(depth);
        //     f. If result is an abrupt completion, then
        //         i. Return ? result.
        // 11. Return UNUSED.
        result.map(|_| ())
    }

    fn module_context(self, agent: &Agent, env: ModuleEnvironment) -> ExecutionContext {
        ExecutionContext {
            ecmascript_code: Some(ECMAScriptCodeEvaluationState {
                lexical_environment: EnvironmentIndex::Module(env),
                variable_environment: EnvironmentIndex::Module(env),
                private_environment: None,
                is_strict_mode: true,
            }),
            function: None,
            realm: self.realm(agent),
            script_or_module: Some(ScriptOrModule::Module(self)),
            coroutine: None,
        }
    }
}

/// Throw the SyntaxError of an import or indirect export that does not
/// resolve to a single binding.
fn check_resolution(
    agent: &Agent,
    resolution: ResolvedExport,
    request: &str,
    name: HeapString,
) -> JsResult<(ModuleIdentifier, Option<HeapString>)> {
    match resolution {
        ResolvedExport::Resolved {
            module,
            binding_name,
        } => Ok((module, binding_name)),
        ResolvedExport::Ambiguous => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            format!(
                "The requested module '{request}' contains conflicting star exports for name '{}'",
                name.to_rust_string(agent)
            ),
        )),
        ResolvedExport::Unresolvable => Err(agent.throw_exception(
            ExceptionType::SyntaxError,
            format!(
                "The requested module '{request}' does not provide an export named '{}'",
                name.to_rust_string(agent)
            ),
        )),
    }
}

/// ### [16.2.1.6.1.1.1 InnerModuleLinking ( module, stack, index )](https://tc39.es/ecma262/#sec-InnerModuleLinking)
fn inner_module_linking(
    agent: &Agent,
    module: ModuleIdentifier,
    stack: &mut Vec<ModuleIdentifier>,
    mut index: u32,
) -> JsResult<u32> {
    // 1. If module is not a Cyclic Module Record, then ...
    // 2. If module.[[Status]] is one of linking, linked, evaluating-async, or
    // evaluated, then
    match module.status(agent) {
        // a. Return index.
        ModuleStatus::Linking
        | ModuleStatus::Linked
        | ModuleStatus::Evaluating
        | ModuleStatus::Evaluated => return Ok(index),
        // 3. Assert: module.[[Status]] is unlinked.
        ModuleStatus::Unlinked => {}
        ModuleStatus::New => {
            return Err(agent.internal_error("linking a module that was not loaded"));
        }
    }
    // 4. Set module.[[Status]] to linking.
    module.set_status(agent, ModuleStatus::Linking);
    // 5. Let moduleIndex be index.
    // 6. Set module.[[DFSIndex]] to index.
    // 7. Set module.[[DFSAncestorIndex]] to index.
    {
        let mut record = module.record_mut(agent);
        record.dfs_index = index;
        record.dfs_ancestor_index = index;
    }
    // 8. Set index to index + 1.
    index += 1;
    // 9. Append module to stack.
    stack.push(module);
    // 10. For each ModuleRequest Record request of module.[[RequestedModules]], do
    for request in module.requested_modules(agent) {
        // a. Let requiredModule be GetImportedModule(module, request).
        let required_module = module.get_imported_module(agent, &request)?;
        // b. Set index to ? InnerModuleLinking(requiredModule, stack, index).
        index = inner_module_linking(agent, required_module, stack, index)?;
        // c. If requiredModule is a Cyclic Module Record, then
        //     i. Assert: requiredModule.[[Status]] is one of linking, linked,
        //     evaluating-async, or evaluated.
        //     ii. Assert: requiredModule.[[Status]] is linking if and only if
        //     stack contains requiredModule.
        //     iii. If requiredModule.[[Status]] is linking, then
        if required_module.status(agent) == ModuleStatus::Linking {
            // 1. Set module.[[DFSAncestorIndex]] to
            // min(module.[[DFSAncestorIndex]], requiredModule.[[DFSAncestorIndex]]).
            let ancestor_index = module
                .dfs_ancestor_index(agent)
                .min(required_module.dfs_ancestor_index(agent));
            module.set_dfs_ancestor_index(agent, ancestor_index);
        }
    }
    // 11. Perform ? module.InitializeEnvironment().
    module.initialize_environment(agent)?;
    // 12. Assert: module occurs exactly once in stack.
    // 13. Assert: module.[[DFSAncestorIndex]] ≤ module.[[DFSIndex]].
    // 14. If module.[[DFSAncestorIndex]] = module.[[DFSIndex]], then
    if module.dfs_ancestor_index(agent) == module.dfs_index(agent) {
        // a. Let done be false.
        // b. Repeat, while done is false,
        while let Some(required_module) = stack.pop() {
            // i. Let requiredModule be the last element of stack.
            // ii. Remove the last element of stack.
            // iii. Assert: requiredModule is a Cyclic Module Record.
            // iv. Set requiredModule.[[Status]] to linked.
            required_module.set_status(agent, ModuleStatus::Linked);
            // v. If requiredModule and module are the same Module Record, set
            // done to true.
            if required_module == module {
                break;
            }
        }
    }
    // 15. Return index.
    Ok(index)
}

/// ### [16.2.1.6.1.3.1 InnerModuleEvaluation ( module, stack, index )](https://tc39.es/ecma262/#sec-innermoduleevaluation)
fn inner_module_evaluation(
    agent: &Agent,
    module: ModuleIdentifier,
    stack: &mut Vec<ModuleIdentifier>,
    mut index: u32,
) -> JsResult<u32> {
    match module.status(agent) {
        // 2. If module.[[Status]] is either evaluating-async or evaluated, then
        ModuleStatus::Evaluated => {
            // a. If module.[[EvaluationError]] is EMPTY, return index.
            // b. Otherwise, return ? module.[[EvaluationError]].
            return match module.evaluation_error(agent) {
                None => Ok(index),
                Some(error) => Err(error),
            };
        }
        // 3. If module.[[Status]] is evaluating, return index.
        ModuleStatus::Evaluating => return Ok(index),
        // 4. Assert: module.[[Status]] is linked.
        ModuleStatus::Linked => {}
        ModuleStatus::New | ModuleStatus::Unlinked | ModuleStatus::Linking => {
            return Err(agent.internal_error("evaluating a module that was not linked"));
        }
    }
    // 5. Set module.[[Status]] to evaluating.
    module.set_status(agent, ModuleStatus::Evaluating);
    // 6. Let moduleIndex be index.
    // 7. Set module.[[DFSIndex]] to index.
    // 8. Set module.[[DFSAncestorIndex]] to index.
    // 9. Set module.[[PendingAsyncDependencies]] to 0.
    {
        let mut record = module.record_mut(agent);
        record.dfs_index = index;
        record.dfs_ancestor_index = index;
    }
    // 10. Set index to index + 1.
    index += 1;
    // 11. Append module to stack.
    stack.push(module);
    // 12. For each ModuleRequest Record request of module.[[RequestedModules]], do
    for request in module.requested_modules(agent) {
        // a. Let requiredModule be GetImportedModule(module, request).
        let required_module = module.get_imported_module(agent, &request)?;
        // b. Set index to ? InnerModuleEvaluation(requiredModule, stack, index).
        index = inner_module_evaluation(agent, required_module, stack, index)?;
        // c. If requiredModule is a Cyclic Module Record, then
        //     i. Assert: requiredModule.[[Status]] is one of evaluating,
        //     evaluating-async, or evaluated.
        //     ii. Assert: requiredModule.[[Status]] is evaluating if and only if
        //     stack contains requiredModule.
        //     iii. If requiredModule.[[Status]] is evaluating, then
        if required_module.status(agent) == ModuleStatus::Evaluating {
            // 1. Set module.[[DFSAncestorIndex]] to
            // min(module.[[DFSAncestorIndex]], requiredModule.[[DFSAncestorIndex]]).
            let ancestor_index = module
                .dfs_ancestor_index(agent)
                .min(required_module.dfs_ancestor_index(agent));
            module.set_dfs_ancestor_index(agent, ancestor_index);
        } else {
            // iv. Else,
            //     1. Set requiredModule to requiredModule.[[CycleRoot]].
            //     2. Assert: requiredModule.[[Status]] is either
            //     evaluating-async or evaluated.
            //     3. If requiredModule.[[EvaluationError]] is not EMPTY, return
            //     ? requiredModule.[[EvaluationError]].
            let cycle_root = required_module
                .record(agent)
                .cycle_root
                .unwrap_or(required_module);
            if let Some(error) = cycle_root.evaluation_error(agent) {
                return Err(error);
            }
        }
    }
    // 13. If module.[[PendingAsyncDependencies]] > 0 or module.[[HasTLA]] is
    // true, then ...
    // 14. Else,
    //     a. Perform ? module.ExecuteModule().
    module.execute_module(agent)?;
    // 15. Assert: module occurs exactly once in stack.
    // 16. Assert: module.[[DFSAncestorIndex]] ≤ module.[[DFSIndex]].
    // 17. If module.[[DFSAncestorIndex]] = module.[[DFSIndex]], then
    if module.dfs_ancestor_index(agent) == module.dfs_index(agent) {
        // a. Let done be false.
        // b. Repeat, while done is false,
        while let Some(required_module) = stack.pop() {
            // i. Let requiredModule be the last element of stack.
            // ii. Remove the last element of stack.
            // iii. Assert: requiredModule is a Cyclic Module Record.
            // iv. Assert: requiredModule.[[AsyncEvaluationOrder]] is either an
            // integer or unset.
            // v. If requiredModule.[[AsyncEvaluationOrder]] is unset, set
            // requiredModule.[[Status]] to evaluated.
            required_module.set_status(agent, ModuleStatus::Evaluated);
            // vii. Set requiredModule.[[CycleRoot]] to module.
            required_module.record_mut(agent).cycle_root = Some(module);
            // vi. If requiredModule and module are the same Module Record, set
            // done to true.
            if required_module == module {
                break;
            }
        }
    }
    // 18. Return index.
    Ok(index)
}

/// ### [16.2.1.7.1 ParseModule ( sourceText, realm, hostDefined )](https://tc39.es/ecma262/#sec-parsemodule)
///
/// Create the Source Text Module Record of an already parsed module.
fn parse_module(
    agent: &Agent,
    realm: Realm,
    body: Module,
    host_defined: Option<Rc<str>>,
) -> ModuleIdentifier {
    // 3. Let requestedModules be the ModuleRequests of body.
    let requested_modules = module_requests(&body.body);
    // 4. Let importEntries be the ImportEntries of body.
    let import_entries = import_entries(agent, &body.body);
    // 5. Let importedBoundNames be ImportedLocalNames(importEntries).
    // 6. Let indirectExportEntries be a new empty List.
    // 7. Let localExportEntries be a new empty List.
    // 8. Let starExportEntries be a new empty List.
    let mut local_export_entries = Vec::new();
    let mut indirect_export_entries = Vec::new();
    let mut star_export_entries = Vec::new();
    // 9. Let exportEntries be the ExportEntries of body.
    // 10. For each ExportEntry Record ee of exportEntries, do
    for ee in export_entries(agent, &body.body) {
        match (&ee.module_request, ee.import_name) {
            // a. If ee.[[ModuleRequest]] is null, then
            (None, _) => {
                let imported = ee.local_name.and_then(|local_name| {
                    import_entries
                        .iter()
                        .find(|ie| ie.local_name == local_name)
                });
                match imported {
                    // i. If importedBoundNames does not contain
                    // ee.[[LocalName]], then
                    //     1. Append ee to localExportEntries.
                    None => local_export_entries.push(ee),
                    // ii. Else,
                    //     1. Let ie be the element of importEntries whose
                    //     [[LocalName]] is ee.[[LocalName]].
                    //     2. If ie.[[ImportName]] is NAMESPACE-OBJECT, then
                    //         a. NOTE: This is a re-export of an imported
                    //         module namespace object.
                    //         b. Append ee to localExportEntries.
                    Some(ie) if ie.import_name.is_none() => local_export_entries.push(ee),
                    //     3. Else,
                    //         a. NOTE: This is a re-export of a single name.
                    //         b. Append the ExportEntry Record {
                    //         [[ModuleRequest]]: ie.[[ModuleRequest]],
                    //         [[ImportName]]: ie.[[ImportName]],
                    //         [[LocalName]]: null, [[ExportName]]:
                    //         ee.[[ExportName]] } to indirectExportEntries.
                    Some(ie) => indirect_export_entries.push(ExportEntry {
                        export_name: ee.export_name,
                        module_request: Some(ie.module_request.clone()),
                        import_name: ie.import_name.map(ExportImportName::Name),
                        local_name: None,
                    }),
                }
            }
            // b. Else if ee.[[ImportName]] is ALL-BUT-DEFAULT, then
            //     i. Assert: ee.[[ExportName]] is null.
            //     ii. Append ee to starExportEntries.
            (Some(_), Some(ExportImportName::AllButDefault)) => star_export_entries.push(ee),
            // c. Else,
            //     i. Append ee to indirectExportEntries.
            (Some(_), _) => indirect_export_entries.push(ee),
        }
    }
    // 11. Let async be body Contains await.
    // 12. Return Source Text Module Record { ... }.
    let mut heap = agent.heap_mut();
    let index = u32::try_from(heap.modules.len()).unwrap_or(u32::MAX);
    heap.modules.push(ModuleRecord {
        realm,
        environment: None,
        namespace: None,
        host_defined,
        ecmascript_code: Rc::new(body),
        import_meta: None,
        status: ModuleStatus::New,
        evaluation_error: None,
        dfs_index: 0,
        dfs_ancestor_index: 0,
        requested_modules,
        loaded_modules: Vec::new(),
        cycle_root: None,
        top_level_capability: None,
        import_entries,
        local_export_entries,
        indirect_export_entries,
        star_export_entries,
    });
    ModuleIdentifier(index)
}

/// ### [16.2.1.3 Static Semantics: ModuleRequests](https://tc39.es/ecma262/#sec-static-semantics-modulerequests)
fn module_requests(body: &[Statement]) -> Vec<Atom> {
    let mut requests: Vec<Atom> = Vec::new();
    for statement in body {
        let request = match statement {
            Statement::Import(import) => &import.module_request,
            Statement::Export(export) => match export.as_ref() {
                ExportDeclaration::Named {
                    module_request: Some(request),
                    ..
                }
                | ExportDeclaration::All {
                    module_request: request,
                    ..
                } => request,
                _ => continue,
            },
            _ => continue,
        };
        if !requests.contains(request) {
            requests.push(request.clone());
        }
    }
    requests
}

/// ### [16.2.2.3 Static Semantics: ImportEntries](https://tc39.es/ecma262/#sec-static-semantics-importentries)
fn import_entries(agent: &Agent, body: &[Statement]) -> Vec<ImportEntry> {
    body.iter()
        .filter_map(|statement| match statement {
            Statement::Import(import) => Some(import),
            _ => None,
        })
        .flat_map(|import| {
            import.bindings.iter().map(|binding| ImportEntry {
                module_request: import.module_request.clone(),
                import_name: match &binding.import_name {
                    ImportName::Named(name) => Some(HeapString::from_str(agent, name)),
                    ImportName::Namespace => None,
                },
                local_name: HeapString::from_str(agent, &binding.local.name),
            })
        })
        .collect()
}

/// ### [16.2.3.2 Static Semantics: ExportEntries](https://tc39.es/ecma262/#sec-static-semantics-exportentries)
fn export_entries(agent: &Agent, body: &[Statement]) -> Vec<ExportEntry> {
    let local = |local_name: &str, export_name: &str| ExportEntry {
        export_name: Some(HeapString::from_str(agent, export_name)),
        module_request: None,
        import_name: None,
        local_name: Some(HeapString::from_str(agent, local_name)),
    };
    let mut entries = Vec::new();
    for statement in body {
        let Statement::Export(export) = statement else {
            continue;
        };
        match export.as_ref() {
            // ExportDeclaration : export VariableStatement
            // ExportDeclaration : export Declaration
            ExportDeclaration::Declaration(declaration) => {
                for name in declaration_bound_names(declaration) {
                    entries.push(local(&name[..], &name[..]));
                }
            }
            // ExportDeclaration : export default HoistableDeclaration
            ExportDeclaration::Default(DefaultExport::Function(function)) => {
                let name = function
                    .name
                    .as_ref()
                    .map_or(DEFAULT_EXPORT_BINDING, |name| &*name.name);
                entries.push(local(name, "default"));
            }
            // ExportDeclaration : export default ClassDeclaration
            ExportDeclaration::Default(DefaultExport::Class(class)) => {
                let name = class
                    .name
                    .as_ref()
                    .map_or(DEFAULT_EXPORT_BINDING, |name| &*name.name);
                entries.push(local(name, "default"));
            }
            // ExportDeclaration : export default AssignmentExpression ;
            ExportDeclaration::Default(DefaultExport::Expression(_)) => {
                entries.push(local(DEFAULT_EXPORT_BINDING, "default"));
            }
            // ExportDeclaration : export NamedExports ;
            ExportDeclaration::Named {
                specifiers,
                module_request: None,
            } => {
                for specifier in specifiers {
                    entries.push(local(&specifier.local[..], &specifier.exported[..]));
                }
            }
            // ExportDeclaration : export ExportFromClause FromClause ;
            ExportDeclaration::Named {
                specifiers,
                module_request: Some(request),
            } => {
                for specifier in specifiers {
                    entries.push(ExportEntry {
                        export_name: Some(HeapString::from_str(agent, &specifier.exported)),
                        module_request: Some(request.clone()),
                        import_name: Some(ExportImportName::Name(HeapString::from_str(
                            agent,
                            &specifier.local,
                        ))),
                        local_name: None,
                    });
                }
            }
            ExportDeclaration::All {
                exported,
                module_request,
            } => entries.push(ExportEntry {
                export_name: exported
                    .as_ref()
                    .map(|name| HeapString::from_str(agent, name)),
                module_request: Some(module_request.clone()),
                import_name: Some(if exported.is_some() {
                    ExportImportName::All
                } else {
                    ExportImportName::AllButDefault
                }),
                local_name: None,
            }),
        }
    }
    entries
}

/// BoundNames of an exported declaration.
fn declaration_bound_names(declaration: &Statement) -> Vec<Atom> {
    let mut names = Vec::new();
    match declaration {
        Statement::VariableDeclaration(variables) => {
            for declarator in &variables.declarations {
                declarator
                    .target
                    .bound_names(&mut |identifier| names.push(identifier.name.clone()));
            }
        }
        Statement::FunctionDeclaration(function) => {
            names.extend(function.name.as_ref().map(|name| name.name.clone()));
        }
        Statement::ClassDeclaration(class) => {
            names.extend(class.name.as_ref().map(|name| name.name.clone()));
        }
        _ => {}
    }
    names
}

/// ### [16.2.1.10 HostLoadImportedModule ( referrer, moduleRequest, hostDefined, payload )](https://tc39.es/ecma262/#sec-HostLoadImportedModule)
///
/// Together with FinishLoadingImportedModule: the host resolves and parses
/// the module, and a module the realm already loaded under the same key is
/// reused.
fn host_load_imported_module(
    agent: &Agent,
    referrer: Referrer,
    specifier: &Atom,
) -> JsResult<ModuleIdentifier> {
    if let Some(module) = referrer.loaded_module(agent, specifier) {
        return Ok(module);
    }
    let realm = referrer.realm(agent);
    let referrer_key = referrer.host_defined(agent);
    let loaded = agent
        .host_hooks()
        .load_imported_module(referrer_key.as_deref(), specifier)
        .map_err(|message| agent.throw_exception(ExceptionType::TypeError, message))?;
    let existing = loaded
        .host_defined
        .as_ref()
        .and_then(|key| agent.realm_record(realm).loaded_modules.get(key).copied());
    let module = match existing {
        Some(module) => module,
        None => {
            let key = loaded.host_defined.clone();
            let module = parse_module(agent, realm, loaded.module, loaded.host_defined);
            if let Some(key) = key {
                agent
                    .realm_record_mut(realm)
                    .loaded_modules
                    .insert(key, module);
            }
            tracing::debug!(event = "load_imported_module", %specifier, module = module.0);
            module
        }
    };
    // FinishLoadingImportedModule
    // 1. If result is a normal completion, then
    //     a. If referrer.[[LoadedModules]] contains a LoadedModuleRequest
    //     Record record such that ModuleRequestsEqual(record, moduleRequest)
    //     is true, then
    //         i. Assert: record.[[Module]] and result.[[Value]] are the same
    //         Module Record.
    //     b. Else,
    //         i. Append the LoadedModuleRequest Record { [[Specifier]]:
    //         moduleRequest.[[Specifier]], [[Attributes]]:
    //         moduleRequest.[[Attributes]], [[Module]]: result.[[Value]] } to
    //         referrer.[[LoadedModules]].
    referrer.insert_loaded_module(agent, specifier.clone(), module);
    Ok(module)
}

/// ### [16.2.1.5.1 LoadRequestedModules ( \[ hostDefined \] )](https://tc39.es/ecma262/#sec-LoadRequestedModules)
///
/// Loading completes before this returns; the error of the first module
/// that fails to load is returned instead of rejecting a promise.
fn load_requested_modules(agent: &Agent, module: ModuleIdentifier) -> JsResult<()> {
    // 3. Let state be the GraphLoadingState Record { [[IsLoading]]: true,
    // [[PendingModulesCount]]: 1, [[Visited]]: « », ... }.
    let mut visited = Vec::new();
    // 4. Perform InnerModuleLoading(state, module).
    inner_module_loading(agent, module, &mut visited)?;
    // InnerModuleLoading, step 4.a: once no module is pending,
    // i. Set state.[[IsLoading]] to false.
    // ii. For each Cyclic Module Record loaded of state.[[Visited]], do
    for loaded in visited {
        // 1. If loaded.[[Status]] is new, set loaded.[[Status]] to unlinked.
        if loaded.status(agent) == ModuleStatus::New {
            loaded.set_status(agent, ModuleStatus::Unlinked);
        }
    }
    Ok(())
}

/// ### [16.2.1.5.1.1 InnerModuleLoading ( state, module )](https://tc39.es/ecma262/#sec-InnerModuleLoading)
fn inner_module_loading(
    agent: &Agent,
    module: ModuleIdentifier,
    visited: &mut Vec<ModuleIdentifier>,
) -> JsResult<()> {
    // 1. Assert: state.[[IsLoading]] is true.
    // 2. If module is a Cyclic Module Record, module.[[Status]] is new, and
    // state.[[Visited]] does not contain module, then
    if module.status(agent) != ModuleStatus::New || visited.contains(&module) {
        return Ok(());
    }
    // a. Append module to state.[[Visited]].
    visited.push(module);
    // b. Let requestedModulesCount be the number of elements in
    // module.[[RequestedModules]].
    // c. Set state.[[PendingModulesCount]] to state.[[PendingModulesCount]] +
    // requestedModulesCount.
    // d. For each ModuleRequest Record request of module.[[RequestedModules]], do
    for request in module.requested_modules(agent) {
        // i. If AllImportAttributesSupported(request.[[Attributes]]) is false, then ...
        // ii. Else if module.[[LoadedModules]] contains a LoadedModuleRequest
        // Record record such that ModuleRequestsEqual(record, request) is
        // true, then
        //     1. Perform InnerModuleLoading(state, record.[[Module]]).
        // iii. Else,
        //     1. Perform HostLoadImportedModule(module, request,
        //     state.[[HostDefined]], state).
        let required_module =
            host_load_imported_module(agent, Referrer::Module(module), &request)?;
        inner_module_loading(agent, required_module, visited)?;
    }
    Ok(())
}

/// ### [10.4.6.12 GetModuleNamespace ( module )](https://tc39.es/ecma262/#sec-getmodulenamespace)
pub(crate) fn get_module_namespace(agent: &Agent, module: ModuleIdentifier) -> Object {
    // 1. Assert: If module is a Cyclic Module Record, then module.[[Status]]
    // is not new or unlinked.
    // 2. Let namespace be module.[[Namespace]].
    // 3. If namespace is EMPTY, then
    if let Some(namespace) = module.record(agent).namespace {
        // 4. Return namespace.
        return namespace;
    }
    // a. Let exportedNames be module.GetExportedNames().
    let exported_names = module.get_exported_names(agent, &mut Vec::new());
    // b. Let unambiguousNames be a new empty List.
    // c. For each element name of exportedNames, do
    //     i. Let resolution be module.ResolveExport(name).
    //     ii. If resolution is a ResolvedBinding Record, append name to
    //     unambiguousNames.
    let unambiguous_names = exported_names
        .into_iter()
        .filter(|name| {
            matches!(
                module.resolve_export(agent, *name),
                ResolvedExport::Resolved { .. }
            )
        })
        .collect();
    // d. Set namespace to ModuleNamespaceCreate(module, unambiguousNames).
    let namespace = module_namespace_create(agent, module, unambiguous_names);
    module.record_mut(agent).namespace = Some(namespace);
    // 4. Return namespace.
    namespace
}

/// ### [13.3.12.1 Runtime Semantics: Evaluation](https://tc39.es/ecma262/#sec-meta-properties-runtime-semantics-evaluation)
///
/// ImportMeta : import . meta
pub(crate) fn import_meta_object(agent: &Agent) -> JsResult<Object> {
    // 1. Let module be GetActiveScriptOrModule().
    // 2. Assert: module is a Source Text Module Record.
    let Some(ScriptOrModule::Module(module)) = get_active_script_or_module(agent) else {
        return Err(agent.internal_error("import.meta outside of a module"));
    };
    // 3. Let importMeta be module.[[ImportMeta]].
    // 4. If importMeta is EMPTY, then
    if let Some(import_meta) = module.record(agent).import_meta {
        // 5. Else,
        //     a. Assert: importMeta is an Object.
        //     b. Return importMeta.
        return Ok(import_meta);
    }
    // a. Set importMeta to OrdinaryObjectCreate(null).
    let import_meta = ordinary_object_create(agent, None);
    // b. Let importMetaValues be HostGetImportMetaProperties(module).
    // c. For each Record { [[Key]], [[Value]] } p of importMetaValues, do
    //     i. Perform ! CreateDataPropertyOrThrow(importMeta, p.[[Key]], p.[[Value]]).
    if let Some(url) = module.host_defined(agent) {
        let url = Value::from_str(agent, &url);
        create_data_property_or_throw(
            agent,
            import_meta,
            PropertyKey::from_str(agent, "url"),
            url,
        )?;
    }
    // d. Perform HostFinalizeImportMeta(importMeta, module).
    // e. Set module.[[ImportMeta]] to importMeta.
    module.record_mut(agent).import_meta = Some(import_meta);
    // f. Return importMeta.
    Ok(import_meta)
}

/// ### [13.3.10.1.1 EvaluateImportCall ( specifierExpression \[ , optionsExpression \] )](https://tc39.es/ecma262/#sec-evaluate-import-call)
///
/// From step 5, with the specifier already evaluated.
pub(crate) fn evaluate_import_call(agent: &Agent, specifier: Value) -> JsResult<Value> {
    // 1. Let referrer be GetActiveScriptOrModule().
    // 2. If referrer is null, set referrer to the current Realm Record.
    let referrer = match get_active_script_or_module(agent) {
        Some(ScriptOrModule::Script(script)) => Referrer::Script(script),
        Some(ScriptOrModule::Module(module)) => Referrer::Module(module),
        None => Referrer::Realm(agent.current_realm()),
    };
    // 7. Let promiseCapability be ! NewPromiseCapability(%Promise%).
    let capability = PromiseCapability::new_intrinsic(agent);
    // 8. Let specifierString be Completion(ToString(specifier)).
    // 9. IfAbruptRejectPromise(specifierString, promiseCapability).
    let specifier =
        match if_abrupt_reject_promise(agent, to_string(agent, specifier), capability)? {
            Ok(specifier) => specifier.as_rc(agent),
            Err(promise) => return Ok(promise),
        };
    tracing::trace!(event = "import_call", %specifier);
    // 13. Let moduleRequest be a new ModuleRequest Record { [[Specifier]]:
    // specifierString, [[Attributes]]: attributes }.
    // 14. Perform HostLoadImportedModule(referrer, moduleRequest, EMPTY,
    // promiseCapability).
    let loaded = host_load_imported_module(agent, referrer, &specifier);
    // FinishLoadingImportedModule, step 2: if result is an abrupt
    // completion, perform ! Call(promiseCapability.[[Reject]], undefined,
    // « result.[[Value]] »).
    let module = match if_abrupt_reject_promise(agent, loaded, capability)? {
        Ok(module) => module,
        Err(promise) => return Ok(promise),
    };
    // Otherwise perform ContinueDynamicImport(promiseCapability, result.[[Value]]).
    continue_dynamic_import(agent, capability, module)?;
    // 15. Return promiseCapability.[[Promise]].
    Ok(Value::Object(capability.promise()))
}

/// ### [16.2.1.11 ContinueDynamicImport ( promiseCapability, moduleCompletion )](https://tc39.es/ecma262/#sec-ContinueDynamicImport)
fn continue_dynamic_import(
    agent: &Agent,
    capability: PromiseCapability,
    module: ModuleIdentifier,
) -> JsResult<()> {
    // 3. Let loadPromise be module.LoadRequestedModules().
    // 4. Let rejectedClosure be a new Abstract Closure with parameters
    // (reason) that captures promiseCapability and performs the following
    // steps when called:
    //     a. Perform ! Call(promiseCapability.[[Reject]], undefined, « reason »).
    //     b. Return NormalCompletion(undefined).
    // 5. Let onRejected be CreateBuiltinFunction(rejectedClosure, 1, "", « »).
    // 6. Let linkAndEvaluateClosure be a new Abstract Closure with no
    // parameters that captures module, promiseCapability, and onRejected and
    // performs the following steps when called:
    //     a. Let link be Completion(module.Link()).
    //     b. If link is an abrupt completion, then
    //         i. Perform ! Call(promiseCapability.[[Reject]], undefined, «
    //         link.[[Value]] »).
    //         ii. Return NormalCompletion(undefined).
    let linked = load_requested_modules(agent, module).and_then(|()| module.link(agent));
    if if_abrupt_reject_promise(agent, linked, capability)?.is_err() {
        return Ok(());
    }
    //     c. Let evaluatePromise be module.Evaluate().
    let evaluate_promise = module.evaluate(agent)?;
    //     d. Let fulfilledClosure be a new Abstract Closure with no parameters
    //     that captures module and promiseCapability and performs the
    //     following steps when called:
    //         i. Let namespace be GetModuleNamespace(module).
    //         ii. Perform ! Call(promiseCapability.[[Resolve]], undefined, «
    //         namespace »).
    //         iii. Return NormalCompletion(undefined).
    //     e. Let onFulfilled be CreateBuiltinFunction(fulfilledClosure, 0, "", « »).
    let on_fulfilled = create_anonymous_builtin_function(agent, 0, move |agent, _, _| {
        let namespace = get_module_namespace(agent, module);
        capability.resolve(agent, Value::Object(namespace))?;
        Ok(Value::Undefined)
    });
    let on_rejected = create_anonymous_builtin_function(agent, 1, move |agent, _, arguments| {
        capability.reject(agent, arguments.get(0))?;
        Ok(Value::Undefined)
    });
    //     f. Perform PerformPromiseThen(evaluatePromise, onFulfilled,
    //     onRejected).
    //     g. Return UNUSED.
    perform_promise_then(
        agent,
        evaluate_promise,
        Value::Object(on_fulfilled),
        Value::Object(on_rejected),
        None,
    );
    Ok(())
}

/// Load, link and evaluate `module` as the root of a module graph in
/// `realm`. Returns the promise of its evaluation.
///
/// A module the realm already loaded under `host_defined` is not loaded
/// again.
pub(crate) fn evaluate_root_module(
    agent: &Agent,
    realm: Realm,
    module: Module,
    host_defined: Option<Rc<str>>,
) -> JsResult<Object> {
    let depth = agent.execution_context_depth();
    agent.push_execution_context(ExecutionContext {
        ecmascript_code: None,
        function: None,
        realm,
        script_or_module: None,
        coroutine: None,
    });
    let result = load_link_and_evaluate(agent, realm, module, host_defined);
    agent.truncate_execution_context_stack(depth);
    result
}

fn load_link_and_evaluate(
    agent: &Agent,
    realm: Realm,
    module: Module,
    host_defined: Option<Rc<str>>,
) -> JsResult<Object> {
    let existing = host_defined
        .as_ref()
        .and_then(|key| agent.realm_record(realm).loaded_modules.get(key).copied());
    let module = match existing {
        Some(module) => module,
        None => {
            let key = host_defined.clone();
            let module = parse_module(agent, realm, module, host_defined);
            if let Some(key) = key {
                agent
                    .realm_record_mut(realm)
                    .loaded_modules
                    .insert(key, module);
            }
            module
        }
    };
    load_requested_modules(agent, module)?;
    module.link(agent)?;
    module.evaluate(agent)
}

/// The outcome of a module evaluation promise once the job queue has been
/// drained.
pub(crate) fn module_evaluation_result(
    agent: &Agent,
    promise: Object,
) -> Result<Value, EvaluationError> {
    match promise_settled_state(agent, promise) {
        Some(Ok(_)) => Ok(Value::Undefined),
        Some(Err(reason)) => Err(EvaluationError::Thrown(reason)),
        None => Err(agent
            .internal_error("module evaluation promise is still pending")
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::ecmascript::execution::{
        Agent,
        agent::{HostHooks, LoadedModule, Options},
    };

    /// Loads modules from a fixed list of sources, keyed by specifier.
    #[derive(Debug)]
    struct SourceMap(Vec<(&'static str, &'static str)>);

    impl HostHooks for SourceMap {
        fn load_imported_module(
            &self,
            _referrer: Option<&str>,
            specifier: &str,
        ) -> Result<LoadedModule, String> {
            let (_, source) = self
                .0
                .iter()
                .find(|(name, _)| *name == specifier)
                .ok_or_else(|| format!("Cannot find module '{specifier}'"))?;
            let module = specter_ast::parse_module(source).map_err(|error| error.message())?;
            Ok(LoadedModule {
                module,
                host_defined: Some(specifier.into()),
            })
        }
    }

    /// Evaluate `main` as a root module, then evaluate the script `read` in
    /// the same realm and render its result.
    fn run_module(
        modules: Vec<(&'static str, &'static str)>,
        main: &'static str,
        read: &'static str,
    ) -> String {
        std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(move || {
                let agent = Agent::new(Options::default(), Rc::new(SourceMap(modules)));
                let realm = agent.create_realm();
                let module = specter_ast::parse_module(main).unwrap();
                if let Err(error) = realm.evaluate_module(&agent, module, Some("main".into())) {
                    return error.to_display_string(&agent);
                }
                let read = specter_ast::parse_script(read, false).unwrap();
                match realm.evaluate_script(&agent, read) {
                    Ok(value) => value.to_display_string(&agent),
                    Err(error) => error.to_display_string(&agent),
                }
            })
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn imports_are_live_bindings() {
        assert_eq!(
            run_module(
                vec![(
                    "counter",
                    "export let count = 0; export function increment() { count++; }"
                )],
                "import { count, increment } from 'counter';
                 const before = count;
                 increment(); increment();
                 globalThis.result = [before, count].join();",
                "result"
            ),
            "0,2"
        );
    }

    #[test]
    fn imported_bindings_are_immutable() {
        assert_eq!(
            run_module(
                vec![("value", "export const value = 1; export let other = 2;")],
                "import { other } from 'value';
                 try { other = 3; } catch (e) { globalThis.result = e.name; }",
                "result"
            ),
            "TypeError"
        );
    }

    #[test]
    fn cyclic_imports_see_hoisted_functions() {
        assert_eq!(
            run_module(
                vec![
                    (
                        "even",
                        "import { isOdd } from 'odd';
                         export function isEven(n) { return n === 0 ? true : isOdd(n - 1); }"
                    ),
                    (
                        "odd",
                        "import { isEven } from 'even';
                         export function isOdd(n) { return n === 0 ? false : isEven(n - 1); }
                         globalThis.order = (globalThis.order || '') + 'odd;';"
                    ),
                ],
                "import { isEven } from 'even';
                 globalThis.order += 'main;';
                 globalThis.result = [isEven(10), isEven(7)].join();",
                "result + ' ' + order"
            ),
            "true,false odd;main;"
        );
    }

    #[test]
    fn uninitialized_bindings_throw_reference_errors_in_cycles() {
        assert_eq!(
            run_module(
                vec![
                    ("a", "import { b } from 'b'; export let a = 'a'; globalThis.seen = b;"),
                    (
                        "b",
                        "import { a } from 'a';
                         try { a } catch (e) { globalThis.error = e.name }
                         export let b = 'b';"
                    ),
                ],
                "import 'a';",
                "[error, seen].join()"
            ),
            "ReferenceError,b"
        );
    }

    #[test]
    fn namespace_objects_expose_sorted_exports() {
        assert_eq!(
            run_module(
                vec![(
                    "lib",
                    "export const zeta = 1, alpha = 2; export default 'd'; export function mid() {}"
                )],
                "import * as ns from 'lib';
                 globalThis.result = [
                     Object.keys(ns).join('/'),
                     Object.getPrototypeOf(ns),
                     Object.isExtensible(ns),
                     ns[Symbol.toStringTag],
                     ns.default,
                     Reflect.set(ns, 'alpha', 5),
                 ].join();",
                "result"
            ),
            "alpha/default/mid/zeta,,false,Module,d,false"
        );
    }

    #[test]
    fn star_exports_skip_default_and_detect_ambiguity() {
        assert_eq!(
            run_module(
                vec![
                    ("left", "export const shared = 1; export const onlyLeft = 2; export default 0;"),
                    ("right", "export const shared = 3;"),
                    ("both", "export * from 'left'; export * from 'right';"),
                ],
                "import * as ns from 'both';
                 globalThis.result = Object.keys(ns).join('/');",
                "result"
            ),
            "onlyLeft"
        );
        assert_eq!(
            run_module(
                vec![
                    ("left", "export const shared = 1;"),
                    ("right", "export const shared = 3;"),
                    ("both", "export * from 'left'; export * from 'right';"),
                ],
                "import { shared } from 'both';",
                "1"
            ),
            "Uncaught SyntaxError: The requested module 'both' contains conflicting star exports for name 'shared'"
        );
    }

    #[test]
    fn re_exports_resolve_through_modules() {
        assert_eq!(
            run_module(
                vec![
                    ("base", "export const value = 42; export default function named() {}"),
                    (
                        "middle",
                        "export { value as answer } from 'base';
                         export * as base from 'base';
                         import fn from 'base';
                         export { fn };"
                    ),
                ],
                "import { answer, base, fn } from 'middle';
                 globalThis.result = [answer, base.value, fn.name].join();",
                "result"
            ),
            "42,42,named"
        );
    }

    #[test]
    fn missing_exports_and_modules_fail_to_link() {
        assert_eq!(
            run_module(
                vec![("lib", "export const x = 1;")],
                "import { y } from 'lib';",
                "1"
            ),
            "Uncaught SyntaxError: The requested module 'lib' does not provide an export named 'y'"
        );
        assert_eq!(
            run_module(vec![], "import 'nowhere';", "1"),
            "Uncaught TypeError: Cannot find module 'nowhere'"
        );
    }

    #[test]
    fn evaluation_errors_are_reported_once_per_graph() {
        assert_eq!(
            run_module(
                vec![(
                    "throws",
                    "globalThis.runs = (globalThis.runs || 0) + 1; throw new RangeError('bad');"
                )],
                "import 'throws';",
                "runs"
            ),
            "Uncaught RangeError: bad"
        );
    }

    #[test]
    fn dynamic_import_resolves_to_the_namespace() {
        assert_eq!(
            run_module(
                vec![("lib", "export const value = 'loaded';")],
                "globalThis.log = [];
                 import('lib').then(ns => log.push(ns.value));
                 import('missing').catch(e => log.push(e.name));
                 log.push('sync');",
                "log.join()"
            ),
            "sync,TypeError,loaded"
        );
    }

    #[test]
    fn modules_are_strict_and_have_import_meta() {
        assert_eq!(
            run_module(
                vec![],
                "globalThis.result = [typeof this, import.meta.url, import.meta === import.meta].join();",
                "result"
            ),
            "undefined,main,true"
        );
    }

    #[test]
    fn each_module_is_evaluated_once() {
        assert_eq!(
            run_module(
                vec![
                    ("shared", "globalThis.count = (globalThis.count || 0) + 1;"),
                    ("a", "import 'shared';"),
                    ("b", "import 'shared';"),
                ],
                "import 'a'; import 'b';",
                "count"
            ),
            "1"
        );
    }
}
