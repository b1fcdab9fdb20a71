//! Main view implementation - Dark Theme

use crate::gui::app::{Message, Status};
use crate::gui::components::url_input;
use crate::gui::theme;
use iced::widget::{button, checkbox, column, container, row, text, Space};
use iced::{Alignment, Element, Length};

/// Create the main view
pub fn main_view(
    url_value: &str,
    audio_only: bool,
    use_spotdl: bool,
    is_downloading: bool,
    status: &Status,
) -> Element<'static, Message> {
    let header = container(
        text("Universal\ndownloader")
            .size(22)
            .horizontal_alignment(iced::alignment::Horizontal::Center)
            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
    )
    .padding(12)
    .width(Length::Fill)
    .center_x()
    .style(iced::theme::Container::Custom(Box::new(
        theme::HeaderContainer,
    )));

    // Trigger stays relabeled and disabled for the whole download.
    let download_button = button(
        text(if is_downloading {
            "downloading..."
        } else {
            "Download"
        })
        .size(15),
    )
    .on_press_maybe((!is_downloading && !url_value.trim().is_empty()).then_some(Message::DownloadButtonPressed))
    .padding([8, 20]);

    let cancel_button = button(text("Cancel").size(14))
        .on_press_maybe(is_downloading.then_some(Message::CancelPressed))
        .padding([8, 14])
        .style(iced::theme::Button::Custom(Box::new(theme::MutedButton)));

    let mut audio_box = checkbox("extract audio", audio_only);
    let mut spotdl_box = checkbox("use spotdl\n(only audio)", use_spotdl);
    if !is_downloading {
        audio_box = audio_box.on_toggle(Message::AudioOnlyToggled);
        spotdl_box = spotdl_box.on_toggle(Message::SpotDlToggled);
    }

    let options = container(row![audio_box, spotdl_box].spacing(20))
        .padding([10, 14])
        .style(iced::theme::Container::Custom(Box::new(
            theme::OptionsContainer,
        )));

    let config_button = button(text("open config folder").size(14))
        .on_press(Message::OpenConfigFolder)
        .padding([8, 14])
        .style(iced::theme::Button::Custom(Box::new(theme::MutedButton)));

    let status_color = match status {
        Status::Failed(_) => theme::DANGER,
        Status::Finished(_) => theme::SUCCESS,
        _ => theme::TEXT_SECONDARY,
    };
    let status_line = text(status.to_string())
        .size(13)
        .style(iced::theme::Text::Color(status_color));

    let form = column![
        row![url_input(url_value, is_downloading), download_button, cancel_button]
            .spacing(10)
            .align_items(Alignment::Center),
        row![options, Space::with_width(Length::Fill), config_button]
            .spacing(10)
            .align_items(Alignment::Center),
        status_line,
    ]
    .spacing(16)
    .padding(20);

    column![header, form].width(Length::Fill).into()
}
