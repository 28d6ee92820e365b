//! Data-layer generator - emits the `cls{Entity}Data` class that calls the
//! table's stored routines through ADO.NET

use tracing::debug;

use crate::metadata::{MetadataProvider, ParameterMetadata};

use super::fragment::{ClassAssembly, Fragment, FragmentKind, SynthesizedClass, DATA_LAYER_ORDER};
use super::naming::{EntityDescriptor, RoutineKind};
use super::type_mapper::TypeMapper;
use super::{fetch_parameters, insert_parameters};

/// Generated code reads its connection string from this class
const SETTINGS_CLASS: &str = "clsSettingData";

/// Generated code logs storage errors through this class
const LOGGER_CLASS: &str = "clsLogger";

/// Indentation of statements inside the generated `using (SqlCommand ...)` block
const COMMAND_INDENT: &str = "                ";

/// Synthesizes the data-access class for one table
pub struct DataLayerSynthesizer<'a> {
    provider: &'a dyn MetadataProvider,
    entity: &'a EntityDescriptor,
}

impl<'a> DataLayerSynthesizer<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, entity: &'a EntityDescriptor) -> Self {
        Self { provider, entity }
    }

    /// Imports, namespace and class opening
    pub fn generate_header(&self) -> Fragment {
        Fragment::new(
            FragmentKind::Header,
            format!(
                r#"using System;
using System.Collections.Generic;
using System.Data;
using System.Threading.Tasks;
using System.Data.SqlClient;
using System.Diagnostics;

namespace {namespace}
{{
public class {class_name}
{{"#,
                namespace = self.entity.data_namespace(),
                class_name = self.entity.data_class_name(),
            ),
        )
    }

    /// Bulk read through `SP_GetAll{Table}`; a storage error yields an empty table
    pub fn generate_get_all(&self) -> Fragment {
        Fragment::new(
            FragmentKind::GetAll,
            format!(
                r#"

public async static Task<DataTable> {method_name}()
{{
    DataTable dt = new DataTable();
    try
    {{
        using (SqlConnection connection = new SqlConnection({settings}.ConnectionString))
        {{
            await connection.OpenAsync();
            using (SqlCommand command = new SqlCommand("{routine}", connection))
            {{
                command.CommandType = CommandType.StoredProcedure;
                using (SqlDataReader reader = await command.ExecuteReaderAsync())
                {{
                    if (reader.HasRows)
                        dt.Load(reader);
                }}
            }}
        }}
    }}
    catch (SqlException ex)
    {{
        {logger}.Log(ex.Message, EventLogEntryType.Error);
    }}
    return dt;
}}"#,
                method_name = self.entity.method_name(RoutineKind::GetAll),
                routine = self.entity.routine_name(RoutineKind::GetAll),
                settings = SETTINGS_CLASS,
                logger = LOGGER_CLASS,
            ),
        )
    }

    /// Fetch `SP_AddNew{Entity}`'s parameters and emit the insert method
    ///
    /// A failed fetch renders as an empty parameter list and the routine name is
    /// recorded in `failed`.
    pub async fn generate_add_new(&self, failed: &mut Vec<String>) -> Fragment {
        let params = self.fetch(RoutineKind::AddNew, failed).await;
        self.render_add_new(&params)
    }

    /// Fetch `SP_Update{Entity}`'s parameters and emit the update method
    pub async fn generate_update(&self, failed: &mut Vec<String>) -> Fragment {
        let params = self.fetch(RoutineKind::Update, failed).await;
        self.render_update(&params)
    }

    /// Fetch `SP_Delete{Entity}`'s parameters and emit the delete method
    pub async fn generate_delete(&self, failed: &mut Vec<String>) -> Fragment {
        let params = self.fetch(RoutineKind::Delete, failed).await;
        self.render_delete(&params)
    }

    /// Closing delimiters for the class and the namespace
    pub fn generate_footer(&self) -> Fragment {
        Fragment::new(FragmentKind::Footer, "\n}\n}\n")
    }

    /// Insert method: OUT and INOUT parameters are left out of the signature and
    /// replaced by a single synthesized OUT identity parameter.
    pub fn render_add_new(&self, params: &[ParameterMetadata]) -> Fragment {
        let inputs = insert_parameters(params);
        let identity = self.entity.identity_name();

        let text = format!(
            r#"

public static int {method_name}({signature})
{{
    int? {identity} = null;
    try
    {{
        using (SqlConnection connection = new SqlConnection({settings}.ConnectionString))
        {{
            connection.Open();
            using (SqlCommand command = new SqlCommand("{routine}", connection))
            {{
                command.CommandType = CommandType.StoredProcedure;
{binds}                SqlParameter outputIdParam = new SqlParameter("@{identity}", SqlDbType.Int)
                {{
                    Direction = ParameterDirection.Output
                }};
                command.Parameters.Add(outputIdParam);
                command.ExecuteNonQuery();
                {identity} = (int)outputIdParam.Value;
            }}
        }}
    }}
    catch (SqlException ex)
    {{
        {logger}.Log(ex.Message, EventLogEntryType.Error);
    }}
    return {identity} ?? -1;
}}"#,
            method_name = self.entity.method_name(RoutineKind::AddNew),
            signature = build_params(&inputs),
            identity = identity,
            routine = self.entity.routine_name(RoutineKind::AddNew),
            binds = generate_bind_section(&inputs),
            settings = SETTINGS_CLASS,
            logger = LOGGER_CLASS,
        );
        Fragment::new(FragmentKind::AddNew, text)
    }

    /// Update method: every parameter is an input, whatever its direction
    pub fn render_update(&self, params: &[ParameterMetadata]) -> Fragment {
        let all: Vec<&ParameterMetadata> = params.iter().collect();

        let text = format!(
            r#"

public static bool {method_name}({signature})
{{
    int rowsAffected = 0;
    try
    {{
        using (SqlConnection connection = new SqlConnection({settings}.ConnectionString))
        {{
            connection.Open();
            using (SqlCommand command = new SqlCommand("{routine}", connection))
            {{
                command.CommandType = CommandType.StoredProcedure;
{binds}                rowsAffected = command.ExecuteNonQuery();
            }}
        }}
    }}
    catch (SqlException ex)
    {{
        {logger}.Log(ex.Message, EventLogEntryType.Error);
    }}
    return rowsAffected > 0;
}}"#,
            method_name = self.entity.method_name(RoutineKind::Update),
            signature = build_params(&all),
            routine = self.entity.routine_name(RoutineKind::Update),
            binds = generate_bind_section(&all),
            settings = SETTINGS_CLASS,
            logger = LOGGER_CLASS,
        );
        Fragment::new(FragmentKind::Update, text)
    }

    /// Delete method: every parameter is an input; success is a positive scalar
    pub fn render_delete(&self, params: &[ParameterMetadata]) -> Fragment {
        let all: Vec<&ParameterMetadata> = params.iter().collect();

        let text = format!(
            r#"

public static bool {method_name}({signature})
{{
    int result = 0;
    try
    {{
        using (SqlConnection connection = new SqlConnection({settings}.ConnectionString))
        {{
            connection.Open();
            using (SqlCommand command = new SqlCommand("{routine}", connection))
            {{
                command.CommandType = CommandType.StoredProcedure;
{binds}                result = (int)command.ExecuteScalar();
            }}
        }}
    }}
    catch (SqlException ex)
    {{
        {logger}.Log(ex.Message, EventLogEntryType.Error);
    }}
    return result > 0;
}}"#,
            method_name = self.entity.method_name(RoutineKind::Delete),
            signature = build_params(&all),
            routine = self.entity.routine_name(RoutineKind::Delete),
            binds = generate_bind_section(&all),
            settings = SETTINGS_CLASS,
            logger = LOGGER_CLASS,
        );
        Fragment::new(FragmentKind::Delete, text)
    }

    /// Fetch all metadata and collect the class fragments
    pub async fn assemble(&self) -> SynthesizedClass {
        let mut failed = Vec::new();
        let add_new = self.generate_add_new(&mut failed).await;
        let update = self.generate_update(&mut failed).await;
        let delete = self.generate_delete(&mut failed).await;

        let mut assembly = ClassAssembly::new(DATA_LAYER_ORDER);
        assembly
            .push(self.generate_header())
            .push(self.generate_get_all())
            .push(add_new)
            .push(update)
            .push(delete)
            .push(self.generate_footer());

        debug!(
            "Assembled {} ({} failed fetches)",
            self.entity.data_class_name(),
            failed.len()
        );
        SynthesizedClass::new(assembly, failed)
    }

    /// Full class text
    pub async fn generate_class(&self) -> String {
        self.assemble().await.render()
    }

    async fn fetch(&self, kind: RoutineKind, failed: &mut Vec<String>) -> Vec<ParameterMetadata> {
        fetch_parameters(self.provider, &self.entity.routine_name(kind), failed).await
    }
}

/// Build a C# parameter list: `int ProductID, string Name`
fn build_params(params: &[&ParameterMetadata]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", TypeMapper::map_type(&p.data_type).type_name(), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One `AddWithValue` line per parameter, each newline-terminated
fn generate_bind_section(params: &[&ParameterMetadata]) -> String {
    params
        .iter()
        .map(|p| {
            format!(
                "{}command.Parameters.AddWithValue(\"@{}\", {});\n",
                COMMAND_INDENT, p.name, p.name
            )
        })
        .collect()
}
