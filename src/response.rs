// taskd: Response Formatter — these strings are part of the wire contract clients parse against

use crate::admission::AdmissionResult;

pub fn activation_reply(result: AdmissionResult, name: &str) -> String {
    match result {
        AdmissionResult::Activated => format!("[SERVER]: Task {name} activated"),
        AdmissionResult::Overloaded => {
            format!("[SERVER]: Task {name} cannot be scheduled (System overloaded)")
        }
        AdmissionResult::NotFound => format!("[SERVER]: Task {name} not found"),
        AdmissionResult::Full => format!("[SERVER]: Maximum tasks reached, cannot activate {name}"),
    }
}

pub fn deactivated_reply(name: &str) -> String {
    format!("[SERVER]: Task {name} deactivated")
}

pub fn invalid_action_reply() -> String {
    "[SERVER]: Invalid action".to_string()
}

pub fn invalid_command_format_reply() -> String {
    "[SERVER]: Invalid command format".to_string()
}
