//! Business-layer generator - emits the `cls{Entity}` domain class with its
//! properties, constructors and the mode-driven `Save()`

use tracing::debug;

use crate::metadata::{ColumnMetadata, MetadataProvider, ParameterMetadata};

use super::fragment::{
    ClassAssembly, Fragment, FragmentKind, SynthesizedClass, BUSINESS_LAYER_ORDER,
};
use super::mode::{ConstructorKind, ModeMachine, SaveAction, Trigger};
use super::naming::{EntityDescriptor, RoutineKind};
use super::type_mapper::TypeMapper;
use super::{fetch_parameters, insert_parameters};

/// Synthesizes the business class for one table.
///
/// Columns are fetched once by [`load`](Self::load); routine parameters are
/// fetched independently of the data layer's own fetches.
pub struct BusinessLayerSynthesizer<'a> {
    provider: &'a dyn MetadataProvider,
    entity: &'a EntityDescriptor,
    columns: Vec<ColumnMetadata>,
    machine: ModeMachine,
    failed_fetches: Vec<String>,
}

impl<'a> BusinessLayerSynthesizer<'a> {
    /// Fetch the table's columns and prepare a synthesizer
    pub async fn load(provider: &'a dyn MetadataProvider, entity: &'a EntityDescriptor) -> Self {
        let result = provider.list_columns(&entity.table_name).await;
        let mut failed_fetches = Vec::new();
        if result.is_failed() {
            failed_fetches.push(entity.table_name.clone());
        }
        debug!("{}: {} columns", entity.table_name, result.len());
        Self::with_columns(provider, entity, result.rows, failed_fetches)
    }

    fn with_columns(
        provider: &'a dyn MetadataProvider,
        entity: &'a EntityDescriptor,
        columns: Vec<ColumnMetadata>,
        failed_fetches: Vec<String>,
    ) -> Self {
        Self {
            provider,
            entity,
            columns,
            machine: ModeMachine::default(),
            failed_fetches,
        }
    }

    pub fn generate_header(&self) -> Fragment {
        Fragment::new(
            FragmentKind::Header,
            format!(
                r#"using {data_namespace};
using System;
using System.Collections.Generic;
using System.Data;
using System.Threading.Tasks;

namespace {namespace}
{{
public class {class_name}
{{"#,
                data_namespace = self.entity.data_namespace(),
                namespace = self.entity.business_namespace(),
                class_name = self.entity.business_class_name(),
            ),
        )
    }

    /// One auto-property per column followed by the mode declaration
    pub fn generate_properties(&self) -> Fragment {
        if self.columns.is_empty() {
            return Fragment::empty(FragmentKind::Properties);
        }

        let mut text = String::new();
        for column in &self.columns {
            text.push_str(&format!(
                "\n\npublic {} {} {{ get; set; }}",
                TypeMapper::column_type(column),
                column.name
            ));
        }
        text.push('\n');
        text.push_str(&self.machine.render_declaration());
        Fragment::new(FragmentKind::Properties, text)
    }

    /// Zero-argument constructor for a new row
    pub fn generate_public_constructor(&self) -> Fragment {
        if self.columns.is_empty() {
            return Fragment::empty(FragmentKind::PublicConstructor);
        }

        let assignments: String = self
            .columns
            .iter()
            .map(|c| format!("\n    this.{} = {};", c.name, TypeMapper::column_initializer(c)))
            .collect();

        Fragment::new(
            FragmentKind::PublicConstructor,
            format!(
                "\n\npublic {class_name}()\n{{{assignments}\n    {mode}\n}}",
                class_name = self.entity.business_class_name(),
                assignments = assignments,
                mode = self
                    .machine
                    .render_initial_assignment(ConstructorKind::Public),
            ),
        )
    }

    /// Full-argument constructor for a loaded row
    pub fn generate_private_constructor(&self) -> Fragment {
        if self.columns.is_empty() {
            return Fragment::empty(FragmentKind::PrivateConstructor);
        }

        let params = self
            .columns
            .iter()
            .map(|c| format!("{} {}", TypeMapper::column_type(c), c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments: String = self
            .columns
            .iter()
            .map(|c| format!("\n    this.{} = {};", c.name, c.name))
            .collect();

        Fragment::new(
            FragmentKind::PrivateConstructor,
            format!(
                "\n\nprivate {class_name}({params})\n{{{assignments}\n    {mode}\n}}",
                class_name = self.entity.business_class_name(),
                params = params,
                assignments = assignments,
                mode = self
                    .machine
                    .render_initial_assignment(ConstructorKind::Private),
            ),
        )
    }

    pub fn generate_get_all(&self) -> Fragment {
        let method_name = self.entity.method_name(RoutineKind::GetAll);
        Fragment::new(
            FragmentKind::GetAll,
            format!(
                "\n\npublic static async Task<DataTable> {method}() => await {data_class}.{method}();",
                method = method_name,
                data_class = self.entity.data_class_name(),
            ),
        )
    }

    /// Fetch `SP_AddNew{Entity}`'s parameters, noting a failed fetch in `failed`
    pub async fn generate_add_new(&self, failed: &mut Vec<String>) -> Fragment {
        let params = self.fetch(RoutineKind::AddNew, failed).await;
        self.render_add_new(&params)
    }

    /// Fetch `SP_Update{Entity}`'s parameters, noting a failed fetch in `failed`
    pub async fn generate_update(&self, failed: &mut Vec<String>) -> Fragment {
        let params = self.fetch(RoutineKind::Update, failed).await;
        self.render_update(&params)
    }

    /// `_AddNew{Entity}()`: forwards the insert inputs and keeps the new identity
    pub fn render_add_new(&self, params: &[ParameterMetadata]) -> Fragment {
        let identity = self.entity.identity_name();
        Fragment::new(
            FragmentKind::AddNew,
            format!(
                "\n\nprivate bool {private_method}()\n{{\n    this.{identity} = {data_class}.{method}({args});\n    return this.{identity} != -1;\n}}",
                private_method = private_method_name(self.entity, RoutineKind::AddNew),
                identity = identity,
                data_class = self.entity.data_class_name(),
                method = self.entity.method_name(RoutineKind::AddNew),
                args = forward_args(&insert_parameters(params)),
            ),
        )
    }

    /// `_Update{Entity}()`: forwards every parameter, whatever its direction
    pub fn render_update(&self, params: &[ParameterMetadata]) -> Fragment {
        let all: Vec<&ParameterMetadata> = params.iter().collect();
        Fragment::new(
            FragmentKind::Update,
            format!(
                "\n\nprivate bool {private_method}() => {data_class}.{method}({args});",
                private_method = private_method_name(self.entity, RoutineKind::Update),
                data_class = self.entity.data_class_name(),
                method = self.entity.method_name(RoutineKind::Update),
                args = forward_args(&all),
            ),
        )
    }

    /// `Save()` dispatching on the current mode
    pub fn generate_save(&self) -> Fragment {
        let field = self.machine.field_name;
        let class_name = self.entity.business_class_name();

        let mut cases = String::new();
        for &state in &self.machine.states {
            let call = match self.machine.save_action(state) {
                SaveAction::Insert => private_method_name(self.entity, RoutineKind::AddNew),
                SaveAction::Update => private_method_name(self.entity, RoutineKind::Update),
            };
            cases.push_str(&format!(
                "\n        case {}.{}:",
                self.machine.enum_name,
                state.as_str()
            ));
            match self.machine.transition(state, Trigger::InsertSucceeded) {
                Some(transition) => cases.push_str(&format!(
                    "\n            if ({call}())\n            {{\n                {assign}\n                return true;\n            }}\n            break;",
                    call = call,
                    assign = self
                        .machine
                        .render_assignment(Some(class_name.as_str()), transition.to),
                )),
                None => cases.push_str(&format!("\n            return {}();", call)),
            }
        }

        Fragment::new(
            FragmentKind::Save,
            format!(
                "\n\npublic bool Save()\n{{\n    switch (this.{field})\n    {{{cases}\n    }}\n    return false;\n}}",
                field = field,
                cases = cases,
            ),
        )
    }

    /// Static delete forwarding the identity to the data layer
    pub fn generate_delete(&self) -> Fragment {
        let identity = self.entity.identity_name();
        Fragment::new(
            FragmentKind::Delete,
            format!(
                "\n\npublic static bool {method}(int {identity}) => {data_class}.{method}({identity});",
                method = self.entity.method_name(RoutineKind::Delete),
                identity = identity,
                data_class = self.entity.data_class_name(),
            ),
        )
    }

    pub fn generate_footer(&self) -> Fragment {
        Fragment::new(FragmentKind::Footer, "\n}\n}\n")
    }

    /// Fetch routine metadata and collect the class fragments
    pub async fn assemble(&self) -> SynthesizedClass {
        let mut failed = self.failed_fetches.clone();
        let add_new = self.generate_add_new(&mut failed).await;
        let update = self.generate_update(&mut failed).await;

        let mut assembly = ClassAssembly::new(BUSINESS_LAYER_ORDER);
        assembly
            .push(self.generate_header())
            .push(self.generate_properties())
            .push(self.generate_public_constructor())
            .push(self.generate_private_constructor())
            .push(self.generate_get_all())
            .push(add_new)
            .push(update)
            .push(self.generate_save())
            .push(self.generate_delete())
            .push(self.generate_footer());

        debug!(
            "Assembled {} ({} failed fetches)",
            self.entity.business_class_name(),
            failed.len()
        );
        SynthesizedClass::new(assembly, failed)
    }

    pub async fn generate_class(&self) -> String {
        self.assemble().await.render()
    }

    async fn fetch(&self, kind: RoutineKind, failed: &mut Vec<String>) -> Vec<ParameterMetadata> {
        fetch_parameters(self.provider, &self.entity.routine_name(kind), failed).await
    }
}

/// `_AddNewProduct`, `_UpdateProduct`
fn private_method_name(entity: &EntityDescriptor, kind: RoutineKind) -> String {
    format!("_{}", entity.method_name(kind))
}

/// `this.Name, this.Price`
fn forward_args(params: &[&ParameterMetadata]) -> String {
    params
        .iter()
        .map(|p| format!("this.{}", p.name))
        .collect::<Vec<_>>()
        .join(", ")
}
