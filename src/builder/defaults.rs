//! Standard fields added to every generated function component.

use super::delimited::to_record;
use crate::core::Category;
use crate::discovery::ParameterDescriptor;

pub const PYFUNC_DROPCLASS: &str = "dlg.apps.pyfunc.PyFuncApp";
pub const DYNLIB_DROPCLASS: &str = "dlg.apps.dynlib.DynlibApp";
pub const LOG_LEVELS: &str = "NOTSET,DEBUG,INFO,WARNING,ERROR,CRITICAL";

struct Standard {
    name: &'static str,
    label: &'static str,
    type_text: &'static str,
    access: &'static str,
    options: &'static str,
    description: &'static str,
}

fn record(standard: &Standard, default: &str) -> ParameterDescriptor {
    let text = to_record(&[
        standard.label,
        default,
        standard.type_text,
        "ComponentParameter",
        standard.access,
        standard.options,
        "False",
        "False",
        standard.description,
    ]);
    ParameterDescriptor::from_record(standard.name, text)
}

/// The standard fields for a generated component, as delimited records.
pub fn application_fields(category: &Category, func_name: &str) -> Vec<ParameterDescriptor> {
    let dropclass = match category {
        Category::DynlibApp => DYNLIB_DROPCLASS,
        _ => PYFUNC_DROPCLASS,
    };

    let mut fields = vec![
        record(
            &Standard {
                name: "func_name",
                label: "Function Name",
                type_text: "String",
                access: "readonly",
                options: "",
                description: "Complete import path of function",
            },
            func_name,
        ),
        record(
            &Standard {
                name: "dropclass",
                label: "Drop Class",
                type_text: "String",
                access: "readonly",
                options: "",
                description: "The python class that implements this application",
            },
            dropclass,
        ),
        record(
            &Standard {
                name: "log_level",
                label: "Log Level",
                type_text: "Select",
                access: "readwrite",
                options: LOG_LEVELS,
                description: "Log level for this application. NOTSET uses the global setting",
            },
            "NOTSET",
        ),
        record(
            &Standard {
                name: "execution_time",
                label: "Execution Time",
                type_text: "Integer",
                access: "readwrite",
                options: "",
                description: "Estimate of execution time (in seconds) for this application",
            },
            "2",
        ),
        record(
            &Standard {
                name: "num_cpus",
                label: "Num CPUs",
                type_text: "Integer",
                access: "readwrite",
                options: "",
                description: "Number of cores used",
            },
            "1",
        ),
        record(
            &Standard {
                name: "group_start",
                label: "Group Start",
                type_text: "Boolean",
                access: "readwrite",
                options: "",
                description: "Is this node the start of a group?",
            },
            "False",
        ),
    ];

    if *category == Category::DynlibApp {
        fields.push(record(
            &Standard {
                name: "libpath",
                label: "Library Path",
                type_text: "String",
                access: "readwrite",
                options: "",
                description: "The location of the shared object library",
            },
            "",
        ));
    }
    fields
}
