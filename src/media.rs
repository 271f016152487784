use super::*;

// Models whether the browser would grant an unprompted play() call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayPolicy {
    Allow,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRequest {
    Play { target: NodeId, granted: bool },
    Pause { target: NodeId },
}

impl Page {
    pub fn set_autoplay_policy(&mut self, policy: AutoplayPolicy) {
        self.autoplay_policy = policy;
    }

    pub fn is_playing(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        let element = self
            .dom
            .element(target)
            .ok_or_else(|| Error::Runtime("media target is not an element".into()))?;
        let tag = element.tag_name.to_ascii_lowercase();
        if tag != "video" && tag != "audio" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "video or audio".into(),
                actual: tag,
            });
        }
        Ok(element.playing)
    }

    pub fn take_media_requests(&mut self) -> Vec<MediaRequest> {
        std::mem::take(&mut self.media_requests)
    }

    // A blocked play() is recorded but swallowed: the element stays paused.
    pub(crate) fn request_play(&mut self, target: NodeId) -> Result<()> {
        let granted = self.autoplay_policy == AutoplayPolicy::Allow;
        if granted {
            let element = self
                .dom
                .element_mut(target)
                .ok_or_else(|| Error::Runtime("play target is not an element".into()))?;
            element.playing = true;
        }
        self.media_requests.push(MediaRequest::Play { target, granted });
        if self.trace {
            let label = self.trace_node_label(target);
            self.trace_line(format!("[media] play {label} granted={granted}"));
        }
        Ok(())
    }

    pub(crate) fn request_pause(&mut self, target: NodeId) -> Result<()> {
        let element = self
            .dom
            .element_mut(target)
            .ok_or_else(|| Error::Runtime("pause target is not an element".into()))?;
        element.playing = false;
        self.media_requests.push(MediaRequest::Pause { target });
        if self.trace {
            let label = self.trace_node_label(target);
            self.trace_line(format!("[media] pause {label}"));
        }
        Ok(())
    }
}
