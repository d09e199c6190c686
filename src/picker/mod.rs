//! Presenting instances through an external picker program and launching the choice.
//!
//! A run goes through formatting the entries, invoking the picker, awaiting its output and
//! dispatching the chosen instance to the launcher. It ends as [`Outcome::Launched`] once the
//! launcher process has started, or as [`Outcome::Cancelled`] when nothing was picked.
pub mod runner;

use std::{
    borrow::Cow,
    path::{self, Path},
};

use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    data::InstanceEntry,
    error::{Error, PickerError},
    prism::launch::LauncherCommand,
    process::Spawner,
};
use self::runner::{LineProtocol, RunnerConfig, sanitise_label};

/// Final state of a pick-and-launch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The launcher was started for the instance with this id
    Launched { id: String },
    /// The picker exited without a selection
    Cancelled,
}

/// Result of interpreting the picker's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<'a> {
    Selected(&'a InstanceEntry),
    Cancelled,
}

/// A formatted picker line together with the line the picker prints back for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerChoice<'a> {
    pub line: String,
    pub selection: String,
    pub entry: &'a InstanceEntry,
}

/// All choices offered to the picker for one run, in presentation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerChoices<'a> {
    choices: Vec<PickerChoice<'a>>,
}

fn absolute_icon_path(path: &Path) -> Cow<'_, Path> {
    if path.is_absolute() {
        return Cow::Borrowed(path);
    }

    path::absolute(path).map_or(Cow::Borrowed(path), Cow::Owned)
}

/// Makes every label that occurs more than once distinct through `distinguish`
fn disambiguate(labels: Vec<String>, distinguish: impl Fn(usize, &str) -> String) -> Vec<String> {
    let label_counts = labels.iter().cloned().counts();

    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            if label_counts[&label] > 1 {
                distinguish(i, &label)
            } else {
                label
            }
        })
        .collect()
}

/// Labels exactly as the picker will print them back. Colliding labels get the instance id
/// appended, and the position as well if the ids still collide once sanitised.
fn unique_labels(entries: &[InstanceEntry]) -> Vec<String> {
    let labels = entries
        .iter()
        .map(|entry| sanitise_label(&entry.label()))
        .collect();
    let labels = disambiguate(labels, |i, label| {
        sanitise_label(&format!("{label} [{}]", entries[i].id))
    });

    disambiguate(labels, |i, label| format!("{label} #{}", i + 1))
}

/// Formats every entry for the picker, keeping catalog order.
///
/// Every selection maps back to exactly one entry.
pub fn format_entries<'a>(
    entries: &'a [InstanceEntry],
    protocol: LineProtocol,
) -> PickerChoices<'a> {
    let choices = entries
        .iter()
        .zip(unique_labels(entries))
        .map(|(entry, label)| {
            let icon = entry.resolved_icon_path.as_deref().map(absolute_icon_path);

            PickerChoice {
                line: protocol.format_line(&label, icon.as_deref()),
                selection: protocol.selection(&label, icon.as_deref()),
                entry,
            }
        })
        .collect();

    PickerChoices { choices }
}

impl<'a> PickerChoices<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &PickerChoice<'a>> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Bytes written to the picker's stdin: one line per choice
    pub fn input(&self) -> Vec<u8> {
        self.choices
            .iter()
            .flat_map(|choice| [choice.line.as_bytes(), b"\n".as_slice()])
            .flatten()
            .copied()
            .collect()
    }

    /// Maps the picker's stdout back to the chosen entry. Only the first line is considered.
    pub fn parse_choice(&self, output: &str) -> Result<Choice<'a>, PickerError> {
        if output.trim_end_matches(['\n', '\r']).is_empty() {
            return Ok(Choice::Cancelled);
        }

        let line = output.lines().next().unwrap_or_default();
        self.choices
            .iter()
            .find(|choice| choice.selection == line)
            .map(|choice| Choice::Selected(choice.entry))
            .ok_or_else(|| PickerError::UnrecognizedChoice(line.to_owned()))
    }
}

/// Shows `entries` in the configured picker and launches the chosen instance.
///
/// Returns once the launcher has been started; the game itself is never waited on.
#[tracing::instrument(level = "trace", skip(entries, spawner))]
pub fn present_and_launch(
    entries: &[InstanceEntry],
    runner: &RunnerConfig,
    launcher: &LauncherCommand,
    spawner: &impl Spawner,
) -> Result<Outcome, Error> {
    let choices = format_entries(entries, runner.runner.profile().protocol);
    debug!("Offering {} instances to {}", choices.len(), runner.runner);

    let output = spawner.run_with_input(runner.command(), &choices.input())?;
    let output = String::from_utf8_lossy(&output);

    let entry = match choices.parse_choice(&output) {
        Ok(Choice::Selected(entry)) => entry,
        Ok(Choice::Cancelled) => {
            info!("No instance selected");
            return Ok(Outcome::Cancelled);
        }
        Err(e) => {
            warn!("{e}");
            return Err(e.into());
        }
    };

    info!("Launching instance '{}'", entry.id);
    spawner.detach(launcher.command(&entry.dir_name))?;

    Ok(Outcome::Launched {
        id: entry.id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf, process::Command};

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::{
        data::Modloader,
        error::{LaunchError, RunnerError},
        picker::runner::Runner,
    };

    /// Spawner which answers with a canned picker output and records every command
    #[derive(Default)]
    struct FakeSpawner {
        output: &'static str,
        input: RefCell<Vec<u8>>,
        detached: RefCell<Vec<Vec<String>>>,
    }

    fn describe(command: &Command) -> Vec<String> {
        std::iter::once(command.get_program())
            .chain(command.get_args())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    impl Spawner for FakeSpawner {
        fn run_with_input(&self, _: Command, input: &[u8]) -> Result<Vec<u8>, RunnerError> {
            self.input.replace(input.to_vec());
            Ok(self.output.as_bytes().to_vec())
        }

        fn detach(&self, command: Command) -> Result<(), LaunchError> {
            self.detached.borrow_mut().push(describe(&command));
            Ok(())
        }
    }

    fn entry(id: &str, name: &str) -> InstanceEntry {
        InstanceEntry {
            display_name: name.to_owned(),
            modloader: Modloader::Fabric,
            resolved_icon_path: Some(PathBuf::from(format!("/icons/{id}.png"))),
            ..InstanceEntry::bare(id)
        }
    }

    fn catalog() -> Vec<InstanceEntry> {
        vec![entry("FabricPack", "Fabric Pack"), entry("Vanilla1", "Vanilla1")]
    }

    #[test_case(Runner::Rofi)]
    #[test_case(Runner::Wofi)]
    #[test_case(Runner::Fuzzel)]
    fn test_round_trip(runner: Runner) {
        let entries = catalog();
        let choices = format_entries(&entries, runner.profile().protocol);

        for choice in choices.iter() {
            let output = format!("{}\n", choice.selection);
            let parsed = choices.parse_choice(&output).unwrap();
            assert_eq!(parsed, Choice::Selected(choice.entry));
        }
    }

    #[test]
    fn test_formatting_is_stable() {
        let entries = catalog();
        let protocol = Runner::Rofi.profile().protocol;

        assert_eq!(
            format_entries(&entries, protocol),
            format_entries(&entries, protocol)
        );
    }

    #[test]
    fn test_input_preserves_order() {
        let entries = catalog();
        let choices = format_entries(&entries, Runner::Wofi.profile().protocol);

        assert_eq!(
            String::from_utf8(choices.input()).unwrap(),
            "img:/icons/FabricPack.png:text:Fabric Pack (Ungrouped)\n\
             img:/icons/Vanilla1.png:text:Vanilla1 (Ungrouped)\n"
        );
    }

    #[test]
    fn test_duplicate_labels_are_disambiguated() {
        let entries = vec![entry("a", "Same"), entry("b", "Same"), entry("c", "Other")];
        let choices = format_entries(&entries, Runner::Rofi.profile().protocol);

        let selections: Vec<_> = choices.iter().map(|c| c.selection.as_str()).collect();
        assert_eq!(
            selections,
            ["Same (Ungrouped) [a]", "Same (Ungrouped) [b]", "Other (Ungrouped)"]
        );
        assert_eq!(
            choices.parse_choice("Same (Ungrouped) [b]\n").unwrap(),
            Choice::Selected(&entries[1])
        );
    }

    #[test]
    fn test_labels_colliding_after_sanitising_are_disambiguated() {
        let grouped = |id: &str, group: &str| InstanceEntry {
            group: Some(group.to_owned()),
            ..entry(id, "Pack")
        };
        let entries = vec![grouped("first", "A\nB"), grouped("second", "A B")];
        let choices = format_entries(&entries, Runner::Rofi.profile().protocol);

        let selections: Vec<_> = choices.iter().map(|c| c.selection.as_str()).collect();
        assert_eq!(selections, ["Pack (A B) [first]", "Pack (A B) [second]"]);
        assert_eq!(
            choices.parse_choice("Pack (A B) [second]\n").unwrap(),
            Choice::Selected(&entries[1])
        );
    }

    #[test]
    fn test_colliding_ids_fall_back_to_position() {
        let entries = vec![entry("a\nb", "Same"), entry("a b", "Same")];
        let choices = format_entries(&entries, Runner::Fuzzel.profile().protocol);

        let selections: Vec<_> = choices.iter().map(|c| c.selection.as_str()).collect();
        assert_eq!(
            selections,
            ["Same (Ungrouped) [a b] #1", "Same (Ungrouped) [a b] #2"]
        );
        for choice in choices.iter() {
            assert_eq!(
                choices.parse_choice(&choice.selection).unwrap(),
                Choice::Selected(choice.entry)
            );
        }
    }

    #[test_case(""; "empty")]
    #[test_case("\n"; "newline only")]
    fn test_empty_output_is_cancelled(output: &str) {
        let entries = catalog();
        let choices = format_entries(&entries, Runner::Rofi.profile().protocol);

        assert_eq!(choices.parse_choice(output).unwrap(), Choice::Cancelled);
    }

    #[test]
    fn test_mutated_line_is_unrecognized() {
        let entries = catalog();
        let choices = format_entries(&entries, Runner::Rofi.profile().protocol);

        let err = choices.parse_choice("fabric pack (ungrouped)\n").unwrap_err();
        assert!(matches!(err, PickerError::UnrecognizedChoice(l) if l == "fabric pack (ungrouped)"));
    }

    #[test]
    fn test_present_and_launch() {
        let spawner = FakeSpawner {
            output: "Fabric Pack (Ungrouped)\n",
            ..Default::default()
        };
        let entries = catalog();

        let outcome = present_and_launch(
            &entries,
            &RunnerConfig::default(),
            &LauncherCommand::default(),
            &spawner,
        )
        .unwrap();

        assert_eq!(
            outcome,
            Outcome::Launched {
                id: String::from("FabricPack")
            }
        );
        assert_eq!(
            spawner.detached.into_inner(),
            [["prismlauncher", "--launch", "FabricPack"]]
        );
    }

    #[test]
    fn test_present_and_launch_cancelled() {
        let spawner = FakeSpawner::default();
        let entries = catalog();

        let outcome = present_and_launch(
            &entries,
            &RunnerConfig::default(),
            &LauncherCommand::default(),
            &spawner,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(!spawner.input.into_inner().is_empty());
        assert!(spawner.detached.into_inner().is_empty());
    }

    #[test]
    fn test_present_and_launch_unrecognized() {
        let spawner = FakeSpawner {
            output: "Something else\n",
            ..Default::default()
        };
        let entries = catalog();

        let err = present_and_launch(
            &entries,
            &RunnerConfig::default(),
            &LauncherCommand::default(),
            &spawner,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Picker(PickerError::UnrecognizedChoice(_))));
        assert!(spawner.detached.into_inner().is_empty());
    }
}
