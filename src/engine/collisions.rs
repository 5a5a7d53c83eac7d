use super::*;

impl GameEngine {
    pub(super) fn collect_bonus(&mut self) {
        let Some(points) = self.bonus.try_collect(self.player.pos()) else {
            return;
        };
        self.session.add_score(points);
        self.stats.bonuses_collected += 1;
        self.events.push(GameEvent::BonusCollected { points });
    }

    /// Proximity checks between the player and every adversary. Captured and
    /// penalized adversaries never interact; a pursuing one ends the run.
    pub(super) fn resolve_adversary_collisions(&mut self) {
        let player_pos = self.player.pos();
        for adversary in self.adversaries.iter_mut() {
            if !adversary.interactable()
                || adversary.pos().distance(player_pos) > COLLISION_DISTANCE
            {
                continue;
            }

            match adversary.state() {
                AdversaryState::Fleeing => {
                    if !adversary.capture() {
                        continue;
                    }
                    self.session.add_score(CAPTURE_POINTS);
                    self.stats.captures += 1;
                    debug!(adversary = %adversary.id, "adversary captured");
                    self.events.push(GameEvent::AdversaryCaptured {
                        adversary_id: adversary.id.clone(),
                        points: CAPTURE_POINTS,
                    });
                    self.events.push(GameEvent::AdversaryTransition {
                        adversary_id: adversary.id.clone(),
                        from: AdversaryState::Fleeing,
                        to: AdversaryState::Captured,
                    });
                }
                AdversaryState::Pursuing => {
                    self.outcome = Some(Outcome::Defeat);
                    self.events.push(GameEvent::Defeat {
                        adversary_id: adversary.id.clone(),
                    });
                    info!(
                        adversary = %adversary.id,
                        level = self.config.level,
                        score = self.session.score(),
                        "player caught"
                    );
                    return;
                }
                AdversaryState::Captured | AdversaryState::Penalized => {}
            }
        }
    }
}
