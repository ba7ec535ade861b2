//! Fork ownership invariant checker
//!
//! Walks a snapshot of every philosopher's fork state in index order and
//! rejects any configuration where two adjacent philosophers both claim the
//! fork between them.

use shared_types::{left_of, right_of, ForkState};

/// Two adjacent philosophers believe they hold the same physical fork
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error(
        "philosopher {index} reports {held} but its left neighbor {neighbor} reports {neighbor_state}"
    )]
    SharedLeftFork {
        index: usize,
        held: ForkState,
        neighbor: usize,
        neighbor_state: ForkState,
    },
    #[error(
        "philosopher {index} reports {held} but its right neighbor {neighbor} reports {neighbor_state}"
    )]
    SharedRightFork {
        index: usize,
        held: ForkState,
        neighbor: usize,
        neighbor_state: ForkState,
    },
}

/// Check one table snapshot, indexed by seat.
pub fn check_ring(states: &[ForkState]) -> Result<(), InvariantViolation> {
    let seats = states.len();
    for (index, &held) in states.iter().enumerate() {
        if held == ForkState::NoFork {
            continue;
        }

        let left = left_of(index, seats);
        if states[left] == ForkState::BothForks {
            return Err(InvariantViolation::SharedLeftFork {
                index,
                held,
                neighbor: left,
                neighbor_state: states[left],
            });
        }

        if held == ForkState::BothForks {
            let right = right_of(index, seats);
            if states[right] != ForkState::NoFork {
                return Err(InvariantViolation::SharedRightFork {
                    index,
                    held,
                    neighbor: right,
                    neighbor_state: states[right],
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ForkState::{BothForks, LeftFork, NoFork};

    #[test]
    fn test_idle_table_is_valid() {
        assert!(check_ring(&[NoFork; 5]).is_ok());
        assert!(check_ring(&[]).is_ok());
    }

    #[test]
    fn test_reachable_tables_are_valid() {
        // Four left forks: the guard's ceiling
        assert!(check_ring(&[LeftFork, LeftFork, LeftFork, LeftFork, NoFork]).is_ok());
        // Two non-adjacent eaters
        assert!(check_ring(&[BothForks, NoFork, BothForks, NoFork, NoFork]).is_ok());
        // Eater whose left neighbor holds only its own left fork
        assert!(check_ring(&[LeftFork, BothForks, NoFork, LeftFork, NoFork]).is_ok());
    }

    #[test]
    fn test_left_fork_against_eating_left_neighbor() {
        // Philosopher 2 holds its left fork while philosopher 1 eats with it;
        // the eater is visited first and trips the right-side check
        let states = [NoFork, BothForks, LeftFork, NoFork, NoFork];
        assert_eq!(
            check_ring(&states),
            Err(InvariantViolation::SharedRightFork {
                index: 1,
                held: BothForks,
                neighbor: 2,
                neighbor_state: LeftFork,
            })
        );
    }

    #[test]
    fn test_left_fork_against_eating_neighbor_across_the_seam() {
        let states = [LeftFork, NoFork, NoFork, NoFork, BothForks];
        assert_eq!(
            check_ring(&states),
            Err(InvariantViolation::SharedLeftFork {
                index: 0,
                held: LeftFork,
                neighbor: 4,
                neighbor_state: BothForks,
            })
        );
    }

    #[test]
    fn test_eater_against_right_neighbor_left_fork() {
        let states = [NoFork, NoFork, NoFork, BothForks, LeftFork];
        assert_eq!(
            check_ring(&states),
            Err(InvariantViolation::SharedRightFork {
                index: 3,
                held: BothForks,
                neighbor: 4,
                neighbor_state: LeftFork,
            })
        );
    }

    #[test]
    fn test_adjacent_eaters_wrap_around() {
        let states = [BothForks, NoFork, NoFork, NoFork, BothForks];
        // Seat 0's left neighbor is seat 4
        assert!(matches!(
            check_ring(&states),
            Err(InvariantViolation::SharedLeftFork {
                index: 0,
                neighbor: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_violation_message_names_both_seats() {
        let err = check_ring(&[LeftFork, NoFork, BothForks]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "philosopher 0 reports left_fork but its left neighbor 2 reports both_forks"
        );
    }
}
