//! Switching the active installation of an instance

use tracing::info;

use super::failure::ExecutionError;
use crate::domain::entities::{Instance, CURRENT_LINK};
use crate::domain::ports::InstanceRepository;
use crate::infrastructure::command_builder::CommandBuilder;

/// Point `current` at installation `number`.
///
/// Fails if the host's current installation no longer matches what was
/// loaded at the start of the run. The link is created under a temporary
/// name and moved over `current` so the swap is atomic.
pub(crate) fn switch_current(
    repository: &dyn InstanceRepository,
    commands: &CommandBuilder,
    instance: &Instance,
    number: u32,
) -> Result<(), ExecutionError> {
    let found = repository.current_number(instance)?;
    if found != instance.current_number() {
        return Err(ExecutionError::concurrent(
            instance.describe(),
            instance.current_number(),
            found,
        ));
    }

    let connection = instance.connection();
    let link = instance.current_link_path();
    let temporary = instance.path().join(format!("{}.tmp", CURRENT_LINK));

    connection
        .run(&commands.remove_recursive(&temporary), None)?
        .into_result()?;
    connection
        .run(
            &commands.create_symlink(&temporary, &instance.installation_path(number)),
            None,
        )?
        .into_result()?;
    connection
        .run(&commands.move_and_replace(&temporary, &link), None)?
        .into_result()?;

    info!(instance = %instance, number, "current installation switched");
    Ok(())
}
