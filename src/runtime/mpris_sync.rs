use crate::mpris::MprisHandle;
use crate::player::{AudioOutput, PlaybackController};

pub fn update_mpris<O: AudioOutput>(mpris: &MprisHandle, controller: &PlaybackController<O>) {
    let status = controller.status();
    mpris.set_track_metadata(status.index, controller.current_track(), status.duration);
    mpris.set_playback(status.state);
}
