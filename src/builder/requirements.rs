//! Fields every node of a given category is expected to carry.

use crate::core::{Category, Field};

const EXECUTION_FIELDS: &[&str] = &["execution_time", "num_cpus"];
const DATA_FIELDS: &[&str] = &["data_volume", "group_end"];
const SHELL_FIELDS: &[&str] = &[
    "input_redirection",
    "output_redirection",
    "command_line_arguments",
    "paramValueSeparator",
    "argumentPrefix",
];

/// The required field names for `category`, in check order.
pub fn required_fields(category: &Category) -> Vec<&'static str> {
    let mut required = Vec::new();

    if category.is_execution_bearing() {
        required.extend_from_slice(EXECUTION_FIELDS);
        if *category != Category::Mpi {
            required.push("group_start");
        }
    }
    match category {
        Category::DynlibApp => required.push("libpath"),
        Category::PythonApp | Category::Branch => required.push("appclass"),
        Category::PyFuncApp => required.push("func_name"),
        _ => {}
    }
    if category.is_data_artifact() {
        required.extend_from_slice(DATA_FIELDS);
    }
    if *category == Category::Mpi {
        required.push("group_end");
    }
    if category.is_shell_style() {
        required.extend_from_slice(SHELL_FIELDS);
    }
    required
}

/// Required names that none of `fields` carries.
pub fn missing_fields<'a>(category: &Category, fields: impl Iterator<Item = &'a Field> + Clone) -> Vec<&'static str> {
    required_fields(category)
        .into_iter()
        .filter(|name| !fields.clone().any(|field| field.name == *name))
        .collect()
}
