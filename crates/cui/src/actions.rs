use crate::app::{App, PromptMode};
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::NextFocus => app.cycle_focus(true),
        InputAction::PrevFocus => app.cycle_focus(false),
        InputAction::MoveUp => app.move_cursor(false),
        InputAction::MoveDown => app.move_cursor(true),
        InputAction::Activate => app.activate_primary(),
        InputAction::Cancel => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.cancel_pick();
            }
        }
        InputAction::AddPlayer => app.open_prompt(PromptMode::AddPlayer),
        InputAction::RemovePlayer => app.remove_current_player(),
        InputAction::TogglePlayer => app.toggle_current_player(),
        InputAction::FilterMethods => app.open_prompt(PromptMode::Filter),
        InputAction::StartRound => app.start_round(),
        InputAction::StopRound => app.stop_round(),
        InputAction::SaveRoster => app.open_prompt(PromptMode::Save),
        InputAction::LoadRoster => app.open_prompt(PromptMode::Load),
    }
}
