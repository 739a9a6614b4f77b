use status::{Color, Status};

/// Reduce a set of statuses to one.
///
/// Blank entries have no influence on the color. Any red wins, otherwise
/// all-green stays green and every other mix shows yellow. The result is
/// running if any input is running.
pub fn aggregate<'a, I>(statuses: I) -> Status
where
    I: IntoIterator<Item = &'a Status>,
{
    let mut all_blank = true;
    let mut all_green = true;
    let mut any_red = false;
    let mut any_running = false;

    for status in statuses {
        any_running |= status.running;
        match status.color {
            Color::Blank => {} // no influence
            Color::Red => {
                all_blank = false;
                all_green = false;
                any_red = true;
            }
            Color::Yellow => {
                all_blank = false;
                all_green = false;
            }
            Color::Green => {
                all_blank = false;
            }
        }
    }

    let color = if all_blank {
        Color::Blank
    } else if any_red {
        Color::Red
    } else if all_green {
        Color::Green
    } else {
        Color::Yellow
    };

    Status::new(color, any_running)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(colors: &[Color]) -> Vec<Status> {
        colors.iter().map(|c| Status::new(*c, false)).collect()
    }

    #[test]
    fn empty_input_is_blank_and_idle() {
        assert_eq!(aggregate(&Vec::new()), Status::BLANK);
    }

    #[test]
    fn blanks_stay_blank() {
        assert_eq!(
            aggregate(&colors(&[Color::Blank, Color::Blank])),
            Status::BLANK
        );
    }

    #[test]
    fn red_beats_everything() {
        assert_eq!(
            aggregate(&colors(&[Color::Red, Color::Green])).color,
            Color::Red
        );
        assert_eq!(
            aggregate(&colors(&[Color::Red, Color::Yellow, Color::Green])).color,
            Color::Red
        );
    }

    #[test]
    fn all_green_is_green() {
        assert_eq!(
            aggregate(&colors(&[Color::Green, Color::Green])).color,
            Color::Green
        );
    }

    #[test]
    fn yellow_in_green_is_yellow() {
        assert_eq!(
            aggregate(&colors(&[Color::Green, Color::Yellow])).color,
            Color::Yellow
        );
    }

    #[test]
    fn blank_does_not_spoil_green() {
        assert_eq!(
            aggregate(&colors(&[Color::Blank, Color::Green, Color::Blank])).color,
            Color::Green
        );
    }

    #[test]
    fn running_is_or_of_inputs() {
        let statuses = vec![
            Status::new(Color::Green, false),
            Status::new(Color::Green, true),
        ];
        assert!(aggregate(&statuses).running);

        let blank_running = vec![Status::new(Color::Blank, true)];
        assert_eq!(aggregate(&blank_running), Status::new(Color::Blank, true));
    }

    #[test]
    fn order_does_not_matter() {
        let forward = colors(&[Color::Yellow, Color::Blank, Color::Red, Color::Green]);
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(aggregate(&forward), aggregate(&backward));
    }
}
